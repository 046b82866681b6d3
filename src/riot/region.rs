use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

fn api_base(host: &str) -> String {
    format!("https://{host}.api.riotgames.com")
}

/// Platform hosts serve TFT-League-v1. Each belongs to exactly one regional cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    BR1,
    LA1,
    LA2,
    NA1,
    JP1,
    KR,
    EUN1,
    EUW1,
    ME1,
    RU,
    TR1,
    OC1,
    PH2,
    SG2,
    TH2,
    TW2,
    VN2,
}

impl Platform {
    pub const ALL: [Platform; 17] = [
        Self::BR1,
        Self::LA1,
        Self::LA2,
        Self::NA1,
        Self::JP1,
        Self::KR,
        Self::EUN1,
        Self::EUW1,
        Self::ME1,
        Self::RU,
        Self::TR1,
        Self::OC1,
        Self::PH2,
        Self::SG2,
        Self::TH2,
        Self::TW2,
        Self::VN2,
    ];

    /// Host label, the cluster holding the same players' matches, and accepted short names.
    fn routing(self) -> (&'static str, Region, &'static [&'static str]) {
        use Region::*;
        match self {
            Self::BR1 => ("br1", Americas, &["br"]),
            Self::LA1 => ("la1", Americas, &["lan"]),
            Self::LA2 => ("la2", Americas, &["las"]),
            Self::NA1 => ("na1", Americas, &["na"]),
            Self::JP1 => ("jp1", Asia, &["jp"]),
            Self::KR => ("kr", Asia, &[]),
            Self::EUN1 => ("eun1", Europe, &["eune", "eun"]),
            Self::EUW1 => ("euw1", Europe, &["euw"]),
            Self::ME1 => ("me1", Europe, &["me"]),
            Self::RU => ("ru", Europe, &[]),
            Self::TR1 => ("tr1", Europe, &["tr"]),
            Self::OC1 => ("oc1", Sea, &["oce", "oc"]),
            Self::PH2 => ("ph2", Sea, &["ph"]),
            Self::SG2 => ("sg2", Sea, &["sg"]),
            Self::TH2 => ("th2", Sea, &["th"]),
            Self::TW2 => ("tw2", Sea, &["tw"]),
            Self::VN2 => ("vn2", Sea, &["vn"]),
        }
    }

    pub fn host(self) -> &'static str {
        self.routing().0
    }

    pub fn region(self) -> Region {
        self.routing().1
    }

    pub fn base_url(self) -> String {
        api_base(self.host())
    }
}

impl FromStr for Platform {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|platform| {
                let (host, _, aliases) = platform.routing();
                host == wanted || aliases.contains(&wanted.as_str())
            })
            .ok_or_else(|| AppError::InvalidRegion(s.to_string()))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.host())
    }
}

/// Regional clusters serve Account-v1 and TFT-Match-v1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Americas,
    Asia,
    Europe,
    Sea,
}

impl Region {
    pub const ALL: [Region; 4] = [Self::Americas, Self::Asia, Self::Europe, Self::Sea];

    pub fn host(self) -> &'static str {
        match self {
            Self::Americas => "americas",
            Self::Asia => "asia",
            Self::Europe => "europe",
            Self::Sea => "sea",
        }
    }

    pub fn base_url(self) -> String {
        api_base(self.host())
    }
}

impl FromStr for Region {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|region| region.host() == wanted)
            .ok_or_else(|| AppError::InvalidRegion(s.to_string()))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.host())
    }
}
