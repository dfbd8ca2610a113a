// Copyright (c) 2025 - Cowboy AI, Inc.
//! Hardware Health polling methods

use serde::{Deserialize, Serialize};

/// Source Orion uses to collect hardware sensor data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HardwarePollingMethod {
    Unknown,
    VMware,
    SnmpDell,
    SnmpHP,
    SnmpIBM,
    VMwareAPI,
    WmiDell,
    WmiHP,
    WmiIBM,
    SnmpCisco,
    SnmpJuniper,
    SnmpNPMHP,
    SnmpF5,
    SnmpDellPowerEdge,
    SnmpDellPowerConnect,
    SnmpDellBladeChassis,
    SnmpHPBladeChassis,
    Forwarded,
    SnmpArista,
}

impl HardwarePollingMethod {
    /// Numeric `PollingMethod` stored in `Orion.HardwareHealth.HardwareInfoBase`
    pub fn id(&self) -> i64 {
        *self as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(HardwarePollingMethod::Unknown => 0)]
    #[test_case(HardwarePollingMethod::SnmpDell => 2)]
    #[test_case(HardwarePollingMethod::SnmpCisco => 9)]
    #[test_case(HardwarePollingMethod::Forwarded => 17)]
    #[test_case(HardwarePollingMethod::SnmpArista => 18)]
    fn test_polling_method_ids(method: HardwarePollingMethod) -> i64 {
        method.id()
    }

    #[test]
    fn test_deserialize_by_name() {
        let method: HardwarePollingMethod = serde_json::from_str("\"SnmpJuniper\"").unwrap();
        assert_eq!(method.id(), 10);
    }
}
