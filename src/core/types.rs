//! Highway classes, transports and properties encoded in way records
//!
//! The codes are stable on disk: a highway class occupies the low five bits of
//! the record `type` byte, and transports/properties are bitmasks where code
//! `n` sets bit `n - 1`.

/// Type-byte flag: the way may only be travelled from its first node to its last
pub const ONEWAY: u8 = 0x20;

/// Type-byte flag: the way is part of a roundabout
pub const ROUNDABOUT: u8 = 0x40;

/// Mask selecting the highway class from a record `type` byte
pub const HIGHWAY_MASK: u8 = 0x1f;

/// Highway classification
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Highway {
    Motorway = 1,
    Trunk = 2,
    Primary = 3,
    Secondary = 4,
    Tertiary = 5,
    Unclassified = 6,
    Residential = 7,
    Service = 8,
    Track = 9,
    Cycleway = 10,
    Path = 11,
    Steps = 12,
    Ferry = 13,
}

impl Highway {
    pub fn all() -> &'static [Highway] {
        &[
            Highway::Motorway,
            Highway::Trunk,
            Highway::Primary,
            Highway::Secondary,
            Highway::Tertiary,
            Highway::Unclassified,
            Highway::Residential,
            Highway::Service,
            Highway::Track,
            Highway::Cycleway,
            Highway::Path,
            Highway::Steps,
            Highway::Ferry,
        ]
    }

    /// Decode the class part of a record `type` byte (flags are ignored)
    pub fn from_code(code: u8) -> Option<Highway> {
        let class = code & HIGHWAY_MASK;
        Self::all().iter().copied().find(|h| *h as u8 == class)
    }

    pub fn from_name(name: &str) -> Option<Highway> {
        Self::all().iter().copied().find(|h| h.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Highway::Motorway => "motorway",
            Highway::Trunk => "trunk",
            Highway::Primary => "primary",
            Highway::Secondary => "secondary",
            Highway::Tertiary => "tertiary",
            Highway::Unclassified => "unclassified",
            Highway::Residential => "residential",
            Highway::Service => "service",
            Highway::Track => "track",
            Highway::Cycleway => "cycleway",
            Highway::Path => "path",
            Highway::Steps => "steps",
            Highway::Ferry => "ferry",
        }
    }

    /// Bit for this class in a highways summary mask
    pub fn bit(&self) -> u16 {
        1 << (*self as u8 - 1)
    }
}

/// Mode of transport permitted on a way
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Transport {
    Foot = 1,
    Horse = 2,
    Wheelchair = 3,
    Bicycle = 4,
    Moped = 5,
    Motorcycle = 6,
    Motorcar = 7,
    Goods = 8,
    Hgv = 9,
    Psv = 10,
}

impl Transport {
    pub fn all() -> &'static [Transport] {
        &[
            Transport::Foot,
            Transport::Horse,
            Transport::Wheelchair,
            Transport::Bicycle,
            Transport::Moped,
            Transport::Motorcycle,
            Transport::Motorcar,
            Transport::Goods,
            Transport::Hgv,
            Transport::Psv,
        ]
    }

    pub fn from_name(name: &str) -> Option<Transport> {
        Self::all().iter().copied().find(|t| t.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Transport::Foot => "foot",
            Transport::Horse => "horse",
            Transport::Wheelchair => "wheelchair",
            Transport::Bicycle => "bicycle",
            Transport::Moped => "moped",
            Transport::Motorcycle => "motorcycle",
            Transport::Motorcar => "motorcar",
            Transport::Goods => "goods",
            Transport::Hgv => "hgv",
            Transport::Psv => "psv",
        }
    }

    pub fn bit(&self) -> u16 {
        1 << (*self as u8 - 1)
    }
}

/// Additional way property
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Property {
    Paved = 1,
    Multilane = 2,
    Bridge = 3,
    Tunnel = 4,
    FootRoute = 5,
    BicycleRoute = 6,
}

impl Property {
    pub fn all() -> &'static [Property] {
        &[
            Property::Paved,
            Property::Multilane,
            Property::Bridge,
            Property::Tunnel,
            Property::FootRoute,
            Property::BicycleRoute,
        ]
    }

    pub fn from_name(name: &str) -> Option<Property> {
        Self::all().iter().copied().find(|p| p.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Property::Paved => "paved",
            Property::Multilane => "multilane",
            Property::Bridge => "bridge",
            Property::Tunnel => "tunnel",
            Property::FootRoute => "footroute",
            Property::BicycleRoute => "bicycleroute",
        }
    }

    pub fn bit(&self) -> u8 {
        1 << (*self as u8 - 1)
    }
}

/// Comma-separated names of the classes set in a highways summary mask
pub fn highways_name_list(highways: u16) -> String {
    Highway::all()
        .iter()
        .filter(|h| highways & h.bit() != 0)
        .map(|h| h.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Comma-separated names of the transports set in an `allow` mask
pub fn allowed_name_list(allow: u16) -> String {
    Transport::all()
        .iter()
        .filter(|t| allow & t.bit() != 0)
        .map(|t| t.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Comma-separated names of the properties set in a `props` mask
pub fn properties_name_list(props: u8) -> String {
    Property::all()
        .iter()
        .filter(|p| props & p.bit() != 0)
        .map(|p| p.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Mask with every defined transport bit set
pub fn all_transports_mask() -> u16 {
    Transport::all().iter().fold(0, |mask, t| mask | t.bit())
}

/// Mask with every defined property bit set
pub fn all_properties_mask() -> u8 {
    Property::all().iter().fold(0, |mask, p| mask | p.bit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highway_code_ignores_flags() {
        let code = Highway::Primary as u8 | ONEWAY | ROUNDABOUT;
        assert_eq!(Highway::from_code(code), Some(Highway::Primary));
        assert_eq!(Highway::from_code(0), None);
        assert_eq!(Highway::from_code(14), None);
    }

    #[test]
    fn test_names_round_trip() {
        for h in Highway::all() {
            assert_eq!(Highway::from_name(h.name()), Some(*h));
        }
        for t in Transport::all() {
            assert_eq!(Transport::from_name(t.name()), Some(*t));
        }
        for p in Property::all() {
            assert_eq!(Property::from_name(p.name()), Some(*p));
        }
        assert_eq!(Transport::from_name("spaceship"), None);
    }

    #[test]
    fn test_name_lists_follow_enum_order() {
        let allow = Transport::Motorcar.bit() | Transport::Foot.bit() | Transport::Bicycle.bit();
        assert_eq!(allowed_name_list(allow), "foot, bicycle, motorcar");

        let highways = Highway::Ferry.bit() | Highway::Motorway.bit();
        assert_eq!(highways_name_list(highways), "motorway, ferry");

        assert_eq!(properties_name_list(0), "");
        assert_eq!(
            properties_name_list(Property::Tunnel.bit() | Property::Paved.bit()),
            "paved, tunnel"
        );
    }

    #[test]
    fn test_full_masks() {
        assert_eq!(all_transports_mask(), 0x03ff);
        assert_eq!(all_properties_mask(), 0x3f);
    }
}
