//! Kubernetes resource quantities
//!
//! CPU is tracked in millicores and memory in mebibytes so escalation rules can
//! compare values numerically. Both render in the canonical quantity syntax
//! (`"500m"`, `"256Mi"`, `"1Gi"`).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid resource quantity: {0}")]
pub struct QuantityError(String);

/// CPU quantity in millicores
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cpu(u32);

impl Cpu {
    pub const fn millis(millis: u32) -> Self {
        Self(millis)
    }

    pub fn as_millis(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Cpu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m", self.0)
    }
}

impl FromStr for Cpu {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parsed = match s.strip_suffix('m') {
            Some(millis) => millis.parse::<u32>().ok(),
            None => s
                .parse::<f64>()
                .ok()
                .filter(|cores| *cores >= 0.0)
                .map(|cores| (cores * 1000.0).round() as u32),
        };
        parsed.map(Cpu).ok_or_else(|| QuantityError(s.to_string()))
    }
}

/// Memory quantity in mebibytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Memory(u32);

impl Memory {
    pub const fn mebibytes(mib: u32) -> Self {
        Self(mib)
    }

    pub const fn gibibytes(gib: u32) -> Self {
        Self(gib * 1024)
    }

    pub fn as_mebibytes(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 != 0 && self.0 % 1024 == 0 {
            write!(f, "{}Gi", self.0 / 1024)
        } else {
            write!(f, "{}Mi", self.0)
        }
    }
}

impl FromStr for Memory {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || QuantityError(s.to_string());
        let (digits, factor) = if let Some(gi) = s.strip_suffix("Gi") {
            (gi, 1024)
        } else if let Some(mi) = s.strip_suffix("Mi") {
            (mi, 1)
        } else {
            return Err(err());
        };
        let value = digits.parse::<u32>().map_err(|_| err())?;
        value.checked_mul(factor).map(Memory).ok_or_else(err)
    }
}

macro_rules! quantity_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

quantity_serde!(Cpu);
quantity_serde!(Memory);

/// One side (requests or limits) of a container resource block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceQuantities {
    pub cpu: Cpu,
    pub memory: Memory,
}

/// Container resource requests and limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceProfile {
    pub requests: ResourceQuantities,
    pub limits: ResourceQuantities,
}

impl ResourceProfile {
    pub const fn new(
        request_cpu: Cpu,
        request_memory: Memory,
        limit_cpu: Cpu,
        limit_memory: Memory,
    ) -> Self {
        Self {
            requests: ResourceQuantities {
                cpu: request_cpu,
                memory: request_memory,
            },
            limits: ResourceQuantities {
                cpu: limit_cpu,
                memory: limit_memory,
            },
        }
    }
}

/// Profile used when an archetype declares none: 100m/128Mi requests, 500m/512Mi limits.
pub const DEFAULT_RESOURCES: ResourceProfile = ResourceProfile::new(
    Cpu::millis(100),
    Memory::mebibytes(128),
    Cpu::millis(500),
    Memory::mebibytes(512),
);
