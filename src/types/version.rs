use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Release channel of the card operating firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FirmwareType {
    /// Development firmware shipped with SDK cards ("d" suffix)
    Sdk,
    /// Production release ("r" suffix)
    Release,
    /// Special-purpose build, no suffix
    Special,
}

impl FirmwareType {
    const fn suffix(&self) -> &'static str {
        match self {
            Self::Sdk => "d",
            Self::Release => "r",
            Self::Special => "",
        }
    }
}

/// Version of the card operating firmware (COS).
///
/// The display string is a cached rendering of the numeric fields plus the
/// firmware type; it carries no independent state. Ordering compares the
/// numeric fields only, which is what firmware gating on files relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FirmwareVersion {
    /// Major version number
    pub major: u8,
    /// Minor version number
    pub minor: u8,
    /// Hotfix number; zero is omitted from the rendering
    pub hot_fix: u8,
    /// Release channel
    pub firmware_type: FirmwareType,
}

impl FirmwareVersion {
    /// Create a version with no hotfix component.
    pub const fn new(major: u8, minor: u8, firmware_type: FirmwareType) -> Self {
        Self {
            major,
            minor,
            hot_fix: 0,
            firmware_type,
        }
    }

    const fn numeric(&self) -> (u8, u8, u8) {
        (self.major, self.minor, self.hot_fix)
    }
}

impl PartialOrd for FirmwareVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FirmwareVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.numeric().cmp(&other.numeric())
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hot_fix == 0 {
            write!(
                f,
                "{}.{:02}{}",
                self.major,
                self.minor,
                self.firmware_type.suffix()
            )
        } else {
            write!(
                f,
                "{}.{:02}.{}{}",
                self.major,
                self.minor,
                self.hot_fix,
                self.firmware_type.suffix()
            )
        }
    }
}

impl FromStr for FirmwareVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (numbers, firmware_type) = match s.strip_suffix('d') {
            Some(rest) => (rest, FirmwareType::Sdk),
            None => match s.strip_suffix('r') {
                Some(rest) => (rest, FirmwareType::Release),
                None => (s, FirmwareType::Special),
            },
        };

        let mut parts = numbers.split('.');
        let major = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or(Error::InvalidData("malformed firmware version"))?;
        let minor = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or(Error::InvalidData("malformed firmware version"))?;
        let hot_fix = match parts.next() {
            Some(p) => p
                .parse()
                .map_err(|_| Error::InvalidData("malformed firmware version"))?,
            None => 0,
        };
        if parts.next().is_some() {
            return Err(Error::InvalidData("malformed firmware version"));
        }

        Ok(Self {
            major,
            minor,
            hot_fix,
            firmware_type,
        })
    }
}
