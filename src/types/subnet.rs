// ABOUTME: IPv4 CIDR subnet for the managed bridge network.
// ABOUTME: Wraps ipnetwork and insists on a network address without host bits.

use ipnetwork::Ipv4Network;
use serde::de::{self, Deserialize, Deserializer};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubnetError {
    #[error("invalid subnet {input:?}: {reason}")]
    Invalid { input: String, reason: String },

    #[error("subnet {input:?} has host bits set, expected {expected}")]
    HostBitsSet { input: String, expected: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subnet(Ipv4Network);

impl Subnet {
    pub fn parse(input: &str) -> Result<Self, SubnetError> {
        let net = Ipv4Network::from_str(input.trim()).map_err(|e| SubnetError::Invalid {
            input: input.to_string(),
            reason: e.to_string(),
        })?;

        if net.ip() != net.network() {
            return Err(SubnetError::HostBitsSet {
                input: input.to_string(),
                expected: format!("{}/{}", net.network(), net.prefix()),
            });
        }

        Ok(Self(net))
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        self.0.contains(addr)
    }

    pub fn prefix(&self) -> u8 {
        self.0.prefix()
    }
}

impl FromStr for Subnet {
    type Err = SubnetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Subnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0.network(), self.0.prefix())
    }
}

impl<'de> Deserialize<'de> for Subnet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(de::Error::custom)
    }
}
