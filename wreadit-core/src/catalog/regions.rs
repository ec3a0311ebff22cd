use crate::catalog::engine::Engine;

/// Which engine tiers a region's synthesis endpoint offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineSupport {
    All,
    StandardOnly,
}

/// One service region. `id` is the canonical hyphenated identifier; lookups
/// also accept the underscored form some stores use as a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub id: &'static str,
    pub label: &'static str,
    pub engines: EngineSupport,
}

impl Region {
    pub fn supports(&self, engine: Engine) -> bool {
        match self.engines {
            EngineSupport::All => true,
            EngineSupport::StandardOnly => engine == Engine::Standard,
        }
    }
}

/// Regions common to standard and neural synthesis plus object storage.
/// Not a complete region list.
const REGIONS: &[Region] = &[
    Region {
        id: "us-east-1",
        label: "US East (N. Virginia)",
        engines: EngineSupport::All,
    },
    Region {
        id: "us-east-2",
        label: "US East (Ohio)",
        engines: EngineSupport::StandardOnly,
    },
    Region {
        id: "us-west-1",
        label: "US West (N. California)",
        engines: EngineSupport::StandardOnly,
    },
    Region {
        id: "us-west-2",
        label: "US West (Oregon)",
        engines: EngineSupport::All,
    },
    Region {
        id: "af-south-1",
        label: "Africa (Cape Town)",
        engines: EngineSupport::All,
    },
    Region {
        id: "ap-east-1",
        label: "Asia Pacific (Hong Kong)",
        engines: EngineSupport::StandardOnly,
    },
    Region {
        id: "ap-northeast-1",
        label: "Asia Pacific (Tokyo)",
        engines: EngineSupport::All,
    },
    Region {
        id: "ap-northeast-2",
        label: "Asia Pacific (Seoul)",
        engines: EngineSupport::All,
    },
    Region {
        id: "ap-northeast-3",
        label: "Asia Pacific (Osaka)",
        engines: EngineSupport::All,
    },
    Region {
        id: "ap-south-1",
        label: "Asia Pacific (Mumbai)",
        engines: EngineSupport::All,
    },
    Region {
        id: "ap-southeast-1",
        label: "Asia Pacific (Singapore)",
        engines: EngineSupport::All,
    },
    Region {
        id: "ap-southeast-2",
        label: "Asia Pacific (Sydney)",
        engines: EngineSupport::All,
    },
    Region {
        id: "ap-southeast-5",
        label: "Asia Pacific (Malaysia)",
        engines: EngineSupport::All,
    },
    Region {
        id: "cn-northwest-1",
        label: "China (Ningxia)",
        engines: EngineSupport::StandardOnly,
    },
    Region {
        id: "ca-central-1",
        label: "Canada (Central)",
        engines: EngineSupport::All,
    },
    Region {
        id: "eu-central-1",
        label: "Europe (Frankfurt)",
        engines: EngineSupport::All,
    },
    Region {
        id: "eu-west-1",
        label: "Europe (Ireland)",
        engines: EngineSupport::All,
    },
    Region {
        id: "eu-west-2",
        label: "Europe (London)",
        engines: EngineSupport::All,
    },
    Region {
        id: "eu-west-3",
        label: "Europe (Paris)",
        engines: EngineSupport::All,
    },
    Region {
        id: "eu-south-2",
        label: "Europe (Spain)",
        engines: EngineSupport::All,
    },
    Region {
        id: "eu-north-1",
        label: "Europe (Stockholm)",
        engines: EngineSupport::StandardOnly,
    },
    Region {
        id: "me-south-1",
        label: "Middle East (Bahrain)",
        engines: EngineSupport::StandardOnly,
    },
    Region {
        id: "sa-east-1",
        label: "South America (São Paulo)",
        engines: EngineSupport::StandardOnly,
    },
];

/// Full region table in display order.
pub fn all() -> &'static [Region] {
    REGIONS
}

/// Look up a region by id, accepting either hyphenated or underscored form.
/// The empty string never matches.
pub fn find(id: &str) -> Option<&'static Region> {
    if id.is_empty() {
        return None;
    }
    let normalized = id.replace('_', "-");
    REGIONS.iter().find(|r| r.id == normalized)
}

pub fn is_valid(id: &str) -> bool {
    find(id).is_some()
}

/// False for unknown regions rather than an error; callers treat an unknown
/// region the same as an incompatible one.
pub fn supports_engine(id: &str, engine: Engine) -> bool {
    find(id).map(|r| r.supports(engine)).unwrap_or(false)
}
