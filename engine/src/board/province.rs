//! Provinces, powers, and coasts of the standard Diplomacy map.
//!
//! The 75 provinces are enumerated alphabetically by their 3-letter id so
//! the discriminant doubles as an array index. Terrain kind, supply-center
//! status, and split-coast structure are answered by grouped `match` arms
//! rather than a runtime table; the map is fixed for the life of the game.

/// Number of provinces on the standard map.
pub const PROVINCE_COUNT: usize = 75;

/// Number of supply centers on the standard map.
pub const SUPPLY_CENTER_COUNT: usize = 34;

/// A province on the standard Diplomacy map, alphabetical by 3-letter id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
#[rustfmt::skip]
pub enum Province {
    Adr, Aeg, Alb, Ank, Apu, Arm, Bal, Bar, Bel, Ber,
    Bla, Boh, Bot, Bre, Bud, Bul, Bur, Cly, Con, Den,
    Eas, Edi, Eng, Fin, Gal, Gas, Gol, Gre, Hel, Hol,
    Ion, Iri, Kie, Lon, Lvn, Lvp, Mao, Mar, Mos, Mun,
    Naf, Nao, Nap, Nrg, Nth, Nwy, Par, Pic, Pie, Por,
    Pru, Rom, Ruh, Rum, Ser, Sev, Sil, Ska, Smy, Spa,
    Stp, Swe, Syr, Tri, Tun, Tus, Tyr, Tys, Ukr, Ven,
    Vie, Wal, War, Wes, Yor,
}

/// Terrain classification of a province.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProvinceKind {
    Inland,
    Coastal,
    Sea,
}

/// Coast specifier for the three split-coast provinces (bul, spa, stp).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Coast {
    None,
    North,
    South,
    East,
}

impl Coast {
    /// Two-letter tag used in notation (`nc`, `sc`, `ec`); empty for `None`.
    pub const fn tag(self) -> &'static str {
        match self {
            Coast::None => "",
            Coast::North => "nc",
            Coast::South => "sc",
            Coast::East => "ec",
        }
    }

    /// Parses a coast tag as written after a `/` in order notation.
    pub fn from_tag(s: &str) -> Option<Coast> {
        match s {
            "" => Some(Coast::None),
            "nc" => Some(Coast::North),
            "sc" => Some(Coast::South),
            "ec" => Some(Coast::East),
            _ => Option::None,
        }
    }
}

/// All province variants in discriminant order.
#[rustfmt::skip]
pub const ALL_PROVINCES: [Province; PROVINCE_COUNT] = [
    Province::Adr, Province::Aeg, Province::Alb, Province::Ank, Province::Apu,
    Province::Arm, Province::Bal, Province::Bar, Province::Bel, Province::Ber,
    Province::Bla, Province::Boh, Province::Bot, Province::Bre, Province::Bud,
    Province::Bul, Province::Bur, Province::Cly, Province::Con, Province::Den,
    Province::Eas, Province::Edi, Province::Eng, Province::Fin, Province::Gal,
    Province::Gas, Province::Gol, Province::Gre, Province::Hel, Province::Hol,
    Province::Ion, Province::Iri, Province::Kie, Province::Lon, Province::Lvn,
    Province::Lvp, Province::Mao, Province::Mar, Province::Mos, Province::Mun,
    Province::Naf, Province::Nao, Province::Nap, Province::Nrg, Province::Nth,
    Province::Nwy, Province::Par, Province::Pic, Province::Pie, Province::Por,
    Province::Pru, Province::Rom, Province::Ruh, Province::Rum, Province::Ser,
    Province::Sev, Province::Sil, Province::Ska, Province::Smy, Province::Spa,
    Province::Stp, Province::Swe, Province::Syr, Province::Tri, Province::Tun,
    Province::Tus, Province::Tyr, Province::Tys, Province::Ukr, Province::Ven,
    Province::Vie, Province::Wal, Province::War, Province::Wes, Province::Yor,
];

impl Province {
    /// Converts a raw index back into a province, if in range.
    pub fn from_index(idx: usize) -> Option<Province> {
        ALL_PROVINCES.get(idx).copied()
    }

    /// Terrain kind of this province.
    pub const fn kind(self) -> ProvinceKind {
        use Province::*;
        match self {
            Adr | Aeg | Bal | Bar | Bla | Bot | Eas | Eng | Gol | Hel | Ion
            | Iri | Mao | Nao | Nrg | Nth | Ska | Tys | Wes => ProvinceKind::Sea,
            Boh | Bud | Bur | Gal | Mos | Mun | Par | Ruh | Ser | Sil | Tyr
            | Ukr | Vie | War => ProvinceKind::Inland,
            _ => ProvinceKind::Coastal,
        }
    }

    /// Returns true if this province is one of the 34 supply centers.
    pub const fn is_supply_center(self) -> bool {
        use Province::*;
        matches!(
            self,
            Ank | Bel | Ber | Bre | Bud | Bul | Con | Den | Edi | Gre | Hol
                | Kie | Lon | Lvp | Mar | Mos | Mun | Nap | Nwy | Par | Por
                | Rom | Rum | Ser | Sev | Smy | Spa | Stp | Swe | Tri | Tun
                | Ven | Vie | War
        )
    }

    /// Named coasts for split-coast provinces; empty for everything else.
    pub const fn coasts(self) -> &'static [Coast] {
        match self {
            Province::Bul => &[Coast::East, Coast::South],
            Province::Spa | Province::Stp => &[Coast::North, Coast::South],
            _ => &[],
        }
    }

    /// Returns true if this province has named coasts.
    pub const fn has_coasts(self) -> bool {
        !self.coasts().is_empty()
    }

    /// The 3-letter lowercase id used in notation and serialized payloads.
    pub const fn abbr(self) -> &'static str {
        ABBRS[self as usize]
    }

    /// Full display name.
    #[rustfmt::skip]
    pub const fn name(self) -> &'static str {
        use Province::*;
        match self {
            Adr => "Adriatic Sea", Aeg => "Aegean Sea", Alb => "Albania",
            Ank => "Ankara", Apu => "Apulia", Arm => "Armenia",
            Bal => "Baltic Sea", Bar => "Barents Sea", Bel => "Belgium",
            Ber => "Berlin", Bla => "Black Sea", Boh => "Bohemia",
            Bot => "Gulf of Bothnia", Bre => "Brest", Bud => "Budapest",
            Bul => "Bulgaria", Bur => "Burgundy", Cly => "Clyde",
            Con => "Constantinople", Den => "Denmark",
            Eas => "Eastern Mediterranean", Edi => "Edinburgh",
            Eng => "English Channel", Fin => "Finland", Gal => "Galicia",
            Gas => "Gascony", Gol => "Gulf of Lyon", Gre => "Greece",
            Hel => "Heligoland Bight", Hol => "Holland", Ion => "Ionian Sea",
            Iri => "Irish Sea", Kie => "Kiel", Lon => "London",
            Lvn => "Livonia", Lvp => "Liverpool", Mao => "Mid-Atlantic Ocean",
            Mar => "Marseilles", Mos => "Moscow", Mun => "Munich",
            Naf => "North Africa", Nao => "North Atlantic Ocean",
            Nap => "Naples", Nrg => "Norwegian Sea", Nth => "North Sea",
            Nwy => "Norway", Par => "Paris", Pic => "Picardy",
            Pie => "Piedmont", Por => "Portugal", Pru => "Prussia",
            Rom => "Rome", Ruh => "Ruhr", Rum => "Rumania", Ser => "Serbia",
            Sev => "Sevastopol", Sil => "Silesia", Ska => "Skagerrak",
            Smy => "Smyrna", Spa => "Spain", Stp => "St. Petersburg",
            Swe => "Sweden", Syr => "Syria", Tri => "Trieste",
            Tun => "Tunisia", Tus => "Tuscany", Tyr => "Tyrolia",
            Tys => "Tyrrhenian Sea", Ukr => "Ukraine", Ven => "Venice",
            Vie => "Vienna", Wal => "Wales", War => "Warsaw",
            Wes => "Western Mediterranean", Yor => "Yorkshire",
        }
    }

    /// Looks up a province by its 3-letter id.
    pub fn from_abbr(abbr: &str) -> Option<Province> {
        ABBRS
            .iter()
            .position(|a| *a == abbr)
            .and_then(Province::from_index)
    }
}

/// 3-letter ids aligned with the `Province` discriminant.
#[rustfmt::skip]
static ABBRS: [&str; PROVINCE_COUNT] = [
    "adr", "aeg", "alb", "ank", "apu", "arm", "bal", "bar", "bel", "ber",
    "bla", "boh", "bot", "bre", "bud", "bul", "bur", "cly", "con", "den",
    "eas", "edi", "eng", "fin", "gal", "gas", "gol", "gre", "hel", "hol",
    "ion", "iri", "kie", "lon", "lvn", "lvp", "mao", "mar", "mos", "mun",
    "naf", "nao", "nap", "nrg", "nth", "nwy", "par", "pic", "pie", "por",
    "pru", "rom", "ruh", "rum", "ser", "sev", "sil", "ska", "smy", "spa",
    "stp", "swe", "syr", "tri", "tun", "tus", "tyr", "tys", "ukr", "ven",
    "vie", "wal", "war", "wes", "yor",
];

/// One of the seven great powers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Power {
    Austria,
    England,
    France,
    Germany,
    Italy,
    Russia,
    Turkey,
}

/// All seven powers in standard order.
pub const ALL_POWERS: [Power; 7] = [
    Power::Austria,
    Power::England,
    Power::France,
    Power::Germany,
    Power::Italy,
    Power::Russia,
    Power::Turkey,
];

impl Power {
    /// Lowercase full name, as used in serialized payloads.
    pub const fn name(self) -> &'static str {
        match self {
            Power::Austria => "austria",
            Power::England => "england",
            Power::France => "france",
            Power::Germany => "germany",
            Power::Italy => "italy",
            Power::Russia => "russia",
            Power::Turkey => "turkey",
        }
    }

    /// Parses a power from its lowercase full name.
    pub fn from_name(name: &str) -> Option<Power> {
        ALL_POWERS.iter().copied().find(|p| p.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_sequential() {
        for (i, p) in ALL_PROVINCES.iter().enumerate() {
            assert_eq!(*p as usize, i, "{:?} out of order", p);
        }
    }

    #[test]
    fn terrain_kind_counts() {
        let count = |k: ProvinceKind| ALL_PROVINCES.iter().filter(|p| p.kind() == k).count();
        assert_eq!(count(ProvinceKind::Inland), 14);
        assert_eq!(count(ProvinceKind::Sea), 19);
        assert_eq!(count(ProvinceKind::Coastal), 42);
    }

    #[test]
    fn supply_center_count() {
        let sc = ALL_PROVINCES.iter().filter(|p| p.is_supply_center()).count();
        assert_eq!(sc, SUPPLY_CENTER_COUNT);
    }

    #[test]
    fn abbr_roundtrip() {
        for p in ALL_PROVINCES {
            assert_eq!(Province::from_abbr(p.abbr()), Some(p));
        }
        assert_eq!(Province::from_abbr("xyz"), None);
    }

    #[test]
    fn split_coasts() {
        assert_eq!(Province::Bul.coasts(), &[Coast::East, Coast::South]);
        assert_eq!(Province::Spa.coasts(), &[Coast::North, Coast::South]);
        assert_eq!(Province::Stp.coasts(), &[Coast::North, Coast::South]);
        assert_eq!(ALL_PROVINCES.iter().filter(|p| p.has_coasts()).count(), 3);
    }

    #[test]
    fn split_coasts_are_coastal_and_seas_have_no_centers() {
        for p in ALL_PROVINCES {
            if p.has_coasts() {
                assert_eq!(p.kind(), ProvinceKind::Coastal);
            }
            if p.kind() == ProvinceKind::Sea {
                assert!(!p.is_supply_center(), "{:?} is a sea supply center", p);
            }
        }
    }

    #[test]
    fn coast_tag_roundtrip() {
        for c in [Coast::None, Coast::North, Coast::South, Coast::East] {
            assert_eq!(Coast::from_tag(c.tag()), Some(c));
        }
        assert_eq!(Coast::from_tag("wc"), None);
    }

    #[test]
    fn power_name_roundtrip() {
        for p in ALL_POWERS {
            assert_eq!(Power::from_name(p.name()), Some(p));
        }
        assert_eq!(Power::from_name("prussia"), None);
    }
}
