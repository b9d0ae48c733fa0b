//! EVM hard fork selection (`--evm-version`).

use std::fmt;
use std::str::FromStr;

/// Named EVM hard forks, oldest first.
///
/// The derived ordering follows activation order, so version-aware tasks
/// can gate behavior with comparisons like `evm >= EvmVersion::Cancun`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum EvmVersion {
    Homestead,
    TangerineWhistle,
    SpuriousDragon,
    Byzantium,
    Constantinople,
    Petersburg,
    Istanbul,
    Berlin,
    London,
    Paris,
    Shanghai,
    #[default]
    Cancun,
}

impl EvmVersion {
    /// Every known version, in activation order.
    pub const ALL: &'static [EvmVersion] = &[
        EvmVersion::Homestead,
        EvmVersion::TangerineWhistle,
        EvmVersion::SpuriousDragon,
        EvmVersion::Byzantium,
        EvmVersion::Constantinople,
        EvmVersion::Petersburg,
        EvmVersion::Istanbul,
        EvmVersion::Berlin,
        EvmVersion::London,
        EvmVersion::Paris,
        EvmVersion::Shanghai,
        EvmVersion::Cancun,
    ];

    /// The name accepted on the command line, solc-style.
    pub fn as_str(&self) -> &'static str {
        match self {
            EvmVersion::Homestead => "homestead",
            EvmVersion::TangerineWhistle => "tangerineWhistle",
            EvmVersion::SpuriousDragon => "spuriousDragon",
            EvmVersion::Byzantium => "byzantium",
            EvmVersion::Constantinople => "constantinople",
            EvmVersion::Petersburg => "petersburg",
            EvmVersion::Istanbul => "istanbul",
            EvmVersion::Berlin => "berlin",
            EvmVersion::London => "london",
            EvmVersion::Paris => "paris",
            EvmVersion::Shanghai => "shanghai",
            EvmVersion::Cancun => "cancun",
        }
    }
}

impl fmt::Display for EvmVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EvmVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EvmVersion::ALL
            .iter()
            .copied()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<_> = EvmVersion::ALL.iter().map(|v| v.as_str()).collect();
                format!(
                    "unknown EVM version {:?} (expected one of: {})",
                    s,
                    names.join(", ")
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_versions() {
        assert_eq!("byzantium".parse::<EvmVersion>().unwrap(), EvmVersion::Byzantium);
        assert_eq!(
            "tangerineWhistle".parse::<EvmVersion>().unwrap(),
            EvmVersion::TangerineWhistle
        );
    }

    #[test]
    fn rejects_unknown_versions() {
        let err = "frontier2".parse::<EvmVersion>().unwrap_err();
        assert!(err.contains("frontier2"));
        assert!(err.contains("cancun"));
    }

    #[test]
    fn ordering_follows_activation_order() {
        assert!(EvmVersion::Homestead < EvmVersion::Byzantium);
        assert!(EvmVersion::London < EvmVersion::Cancun);
    }

    #[test]
    fn default_is_latest() {
        assert_eq!(EvmVersion::default(), EvmVersion::Cancun);
    }
}
