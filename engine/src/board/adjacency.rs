//! Adjacency graph for the standard Diplomacy map.
//!
//! The map ships as a table of undirected edges, one per bordering pair,
//! with per-class passability and a coast tag where a fleet edge lands on a
//! named coast of a split-coast province (the coast is always on the second
//! endpoint; no two split-coast provinces border each other). A directed
//! per-province index is built lazily on first query.

use std::sync::LazyLock;

use super::province::{Coast, Province, PROVINCE_COUNT};
use crate::board::unit::UnitType;

/// Which unit classes may traverse an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Army,
    Fleet,
    Both,
}

/// An undirected border between two provinces.
#[derive(Debug, Clone, Copy)]
struct Edge {
    a: Province,
    b: Province,
    b_coast: Coast,
    pass: Pass,
}

const fn a(a: Province, b: Province) -> Edge {
    Edge { a, b, b_coast: Coast::None, pass: Pass::Army }
}

const fn f(a: Province, b: Province) -> Edge {
    Edge { a, b, b_coast: Coast::None, pass: Pass::Fleet }
}

const fn fc(a: Province, b: Province, b_coast: Coast) -> Edge {
    Edge { a, b, b_coast, pass: Pass::Fleet }
}

const fn b(a: Province, b: Province) -> Edge {
    Edge { a, b, b_coast: Coast::None, pass: Pass::Both }
}

const NC: Coast = Coast::North;
const SC: Coast = Coast::South;
const EC: Coast = Coast::East;

use Province::*;

/// Number of undirected border entries.
pub const EDGE_COUNT: usize = 217;

/// The complete border table, grouped sea-to-sea, sea-to-coast,
/// inland, mixed coastal, and split-coast sections.
#[rustfmt::skip]
static EDGES: [Edge; EDGE_COUNT] = [
    f(Adr, Ion),
    f(Aeg, Eas),
    f(Aeg, Ion),
    f(Bal, Bot),
    f(Eng, Iri),
    f(Eng, Mao),
    f(Eng, Nth),
    f(Gol, Tys),
    f(Gol, Wes),
    f(Hel, Nth),
    f(Ion, Eas),
    f(Ion, Tys),
    f(Iri, Mao),
    f(Iri, Nao),
    f(Mao, Nao),
    f(Mao, Wes),
    f(Nao, Nrg),
    f(Nth, Nrg),
    f(Nth, Ska),
    f(Nrg, Bar),
    f(Tys, Wes),
    f(Adr, Alb),
    f(Adr, Apu),
    f(Adr, Tri),
    f(Adr, Ven),
    fc(Aeg, Bul, SC),
    f(Aeg, Con),
    f(Aeg, Gre),
    f(Aeg, Smy),
    f(Bal, Ber),
    f(Bal, Den),
    f(Bal, Kie),
    f(Bal, Lvn),
    f(Bal, Pru),
    f(Bal, Swe),
    f(Bar, Nwy),
    fc(Bar, Stp, NC),
    f(Bla, Ank),
    f(Bla, Arm),
    fc(Bla, Bul, EC),
    f(Bla, Con),
    f(Bla, Rum),
    f(Bla, Sev),
    f(Bot, Fin),
    f(Bot, Lvn),
    fc(Bot, Stp, SC),
    f(Bot, Swe),
    f(Eas, Smy),
    f(Eas, Syr),
    f(Eng, Bel),
    f(Eng, Bre),
    f(Eng, Lon),
    f(Eng, Pic),
    f(Eng, Wal),
    f(Gol, Mar),
    f(Gol, Pie),
    fc(Gol, Spa, SC),
    f(Gol, Tus),
    f(Hel, Den),
    f(Hel, Hol),
    f(Hel, Kie),
    f(Ion, Alb),
    f(Ion, Apu),
    f(Ion, Gre),
    f(Ion, Nap),
    f(Ion, Tun),
    f(Iri, Lvp),
    f(Iri, Wal),
    f(Mao, Bre),
    f(Mao, Gas),
    f(Mao, Naf),
    f(Mao, Por),
    fc(Mao, Spa, NC),
    fc(Mao, Spa, SC),
    f(Nao, Cly),
    f(Nao, Lvp),
    f(Nth, Bel),
    f(Nth, Den),
    f(Nth, Edi),
    f(Nth, Hol),
    f(Nth, Lon),
    f(Nth, Nwy),
    f(Nth, Yor),
    f(Nrg, Cly),
    f(Nrg, Edi),
    f(Nrg, Nwy),
    f(Ska, Den),
    f(Ska, Nwy),
    f(Ska, Swe),
    f(Tys, Nap),
    f(Tys, Rom),
    f(Tys, Tun),
    f(Tys, Tus),
    f(Wes, Naf),
    fc(Wes, Spa, SC),
    f(Wes, Tun),
    a(Boh, Gal),
    a(Boh, Mun),
    a(Boh, Sil),
    a(Boh, Tyr),
    a(Boh, Vie),
    a(Bud, Gal),
    a(Bud, Vie),
    a(Bur, Mun),
    a(Bur, Par),
    a(Bur, Ruh),
    a(Gal, Sil),
    a(Gal, Ukr),
    a(Gal, Vie),
    a(Gal, War),
    a(Mos, Ukr),
    a(Mos, War),
    a(Mun, Ruh),
    a(Mun, Sil),
    a(Mun, Tyr),
    a(Sil, War),
    a(Tyr, Vie),
    a(Ukr, War),
    a(Bud, Rum),
    a(Bud, Ser),
    a(Bud, Tri),
    a(Bur, Bel),
    a(Bur, Gas),
    a(Bur, Mar),
    a(Bur, Pic),
    a(Gal, Rum),
    a(Gas, Mar),
    a(Mos, Lvn),
    a(Mos, Sev),
    a(Mos, Stp),
    a(Mun, Ber),
    a(Mun, Kie),
    a(Par, Bre),
    a(Par, Gas),
    a(Par, Pic),
    a(Ruh, Bel),
    a(Ruh, Hol),
    a(Ruh, Kie),
    a(Ser, Alb),
    a(Ser, Bul),
    a(Ser, Gre),
    a(Ser, Rum),
    a(Ser, Tri),
    a(Sil, Ber),
    a(Sil, Pru),
    a(Tyr, Pie),
    a(Tyr, Tri),
    a(Tyr, Ven),
    a(Ukr, Rum),
    a(Ukr, Sev),
    a(Vie, Tri),
    a(War, Lvn),
    a(War, Pru),
    b(Alb, Gre),
    b(Alb, Tri),
    b(Ank, Arm),
    b(Ank, Con),
    b(Apu, Nap),
    b(Apu, Ven),
    b(Bel, Hol),
    b(Bel, Pic),
    b(Ber, Kie),
    b(Ber, Pru),
    b(Bre, Gas),
    b(Bre, Pic),
    b(Cly, Edi),
    b(Cly, Lvp),
    b(Con, Smy),
    b(Den, Kie),
    b(Den, Swe),
    a(Edi, Lvp),
    b(Edi, Yor),
    a(Fin, Nwy),
    b(Fin, Swe),
    b(Lon, Wal),
    b(Lon, Yor),
    b(Lvp, Wal),
    b(Mar, Pie),
    b(Naf, Tun),
    b(Nwy, Swe),
    b(Pie, Tus),
    a(Pie, Ven),
    b(Pru, Lvn),
    b(Rom, Nap),
    b(Rom, Tus),
    a(Rom, Ven),
    b(Sev, Arm),
    b(Sev, Rum),
    a(Smy, Arm),
    b(Smy, Syr),
    b(Tri, Ven),
    a(Wal, Yor),
    fc(Con, Bul, EC),
    fc(Con, Bul, SC),
    fc(Gre, Bul, SC),
    fc(Rum, Bul, EC),
    fc(Gas, Spa, NC),
    fc(Mar, Spa, SC),
    fc(Por, Spa, NC),
    fc(Por, Spa, SC),
    fc(Fin, Stp, SC),
    fc(Lvn, Stp, SC),
    fc(Nwy, Stp, NC),
    a(Con, Bul),
    a(Gre, Bul),
    a(Rum, Bul),
    a(Gas, Spa),
    a(Mar, Spa),
    a(Por, Spa),
    a(Fin, Stp),
    a(Lvn, Stp),
    a(Nwy, Stp),
    a(Ank, Smy),
    a(Apu, Rom),
    a(Lvp, Yor),
    a(Tus, Ven),
    a(Arm, Syr),
];

/// A directed traversal option out of a province.
#[derive(Debug, Clone, Copy)]
struct Link {
    to: Province,
    from_coast: Coast,
    to_coast: Coast,
    army: bool,
    fleet: bool,
}

/// Per-province directed adjacency lists, symmetrised from `EDGES`.
static LINKS: LazyLock<[Vec<Link>; PROVINCE_COUNT]> = LazyLock::new(|| {
    let mut links: [Vec<Link>; PROVINCE_COUNT] = std::array::from_fn(|_| Vec::new());
    for e in &EDGES {
        let (army, fleet) = match e.pass {
            Pass::Army => (true, false),
            Pass::Fleet => (false, true),
            Pass::Both => (true, true),
        };
        links[e.a as usize].push(Link {
            to: e.b,
            from_coast: Coast::None,
            to_coast: e.b_coast,
            army,
            fleet,
        });
        links[e.b as usize].push(Link {
            to: e.a,
            from_coast: e.b_coast,
            to_coast: Coast::None,
            army,
            fleet,
        });
    }
    links
});

/// Returns true if a unit of the given class can move from `src` to `dst`.
///
/// Coasts are matched only when both sides name one: `Coast::None` acts as
/// a wildcard, so callers that do not care about coasts can pass it.
pub fn adjacent(
    src: Province,
    src_coast: Coast,
    dst: Province,
    dst_coast: Coast,
    unit_type: UnitType,
) -> bool {
    let is_fleet = unit_type == UnitType::Fleet;
    LINKS[src as usize].iter().any(|l| {
        l.to == dst
            && (if is_fleet { l.fleet } else { l.army })
            && coast_matches(src_coast, l.from_coast)
            && coast_matches(dst_coast, l.to_coast)
    })
}

fn coast_matches(wanted: Coast, on_edge: Coast) -> bool {
    wanted == Coast::None || on_edge == Coast::None || wanted == on_edge
}

/// All provinces reachable in one move by the given unit class.
pub fn neighbors(src: Province, src_coast: Coast, unit_type: UnitType) -> Vec<Province> {
    let is_fleet = unit_type == UnitType::Fleet;
    let mut out = Vec::new();
    for l in LINKS[src as usize].iter() {
        if (if is_fleet { l.fleet } else { l.army })
            && coast_matches(src_coast, l.from_coast)
            && !out.contains(&l.to)
        {
            out.push(l.to);
        }
    }
    out.sort();
    out
}

/// Destination coasts reachable by a fleet moving from `src` to `dst`.
pub fn fleet_coasts_between(src: Province, src_coast: Coast, dst: Province) -> Vec<Coast> {
    let mut out = Vec::new();
    for l in LINKS[src as usize].iter() {
        if l.to == dst && l.fleet && coast_matches(src_coast, l.from_coast)
            && !out.contains(&l.to_coast)
        {
            out.push(l.to_coast);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::super::province::{ProvinceKind, ALL_PROVINCES};
    use super::*;

    #[test]
    fn edge_count_matches() {
        assert_eq!(EDGES.len(), EDGE_COUNT);
    }

    #[test]
    fn no_self_borders_or_duplicates() {
        for (i, e) in EDGES.iter().enumerate() {
            assert_ne!(e.a, e.b, "self border on {:?}", e.a);
            for other in &EDGES[i + 1..] {
                let same = (other.a == e.a && other.b == e.b && other.b_coast == e.b_coast)
                    || (other.a == e.b && other.b == e.a && e.b_coast == Coast::None);
                assert!(
                    !(same && std::mem::discriminant(&other.pass) == std::mem::discriminant(&e.pass)),
                    "duplicate border {:?}-{:?}",
                    e.a,
                    e.b
                );
            }
        }
    }

    #[test]
    fn adjacency_is_symmetric() {
        for p in ALL_PROVINCES {
            for q in neighbors(p, Coast::None, UnitType::Army) {
                assert!(
                    adjacent(q, Coast::None, p, Coast::None, UnitType::Army),
                    "army edge {:?}->{:?} has no reverse",
                    p,
                    q
                );
            }
            for q in neighbors(p, Coast::None, UnitType::Fleet) {
                assert!(
                    adjacent(q, Coast::None, p, Coast::None, UnitType::Fleet),
                    "fleet edge {:?}->{:?} has no reverse",
                    p,
                    q
                );
            }
        }
    }

    #[test]
    fn terrain_respects_unit_class() {
        for e in EDGES.iter() {
            match e.pass {
                Pass::Army | Pass::Both => {
                    assert_ne!(e.a.kind(), ProvinceKind::Sea, "army edge from sea {:?}", e.a);
                    assert_ne!(e.b.kind(), ProvinceKind::Sea, "army edge into sea {:?}", e.b);
                }
                Pass::Fleet => {
                    assert_ne!(e.a.kind(), ProvinceKind::Inland, "fleet edge from inland {:?}", e.a);
                    assert_ne!(e.b.kind(), ProvinceKind::Inland, "fleet edge into inland {:?}", e.b);
                }
            }
        }
    }

    #[test]
    fn known_borders() {
        assert!(adjacent(Par, Coast::None, Bur, Coast::None, UnitType::Army));
        assert!(adjacent(Mun, Coast::None, Bur, Coast::None, UnitType::Army));
        assert!(!adjacent(Par, Coast::None, Mun, Coast::None, UnitType::Army));
        assert!(adjacent(Nth, Coast::None, Nwy, Coast::None, UnitType::Fleet));
        assert!(!adjacent(Nth, Coast::None, Pic, Coast::None, UnitType::Fleet));
        // Armies never use fleet-only edges and vice versa.
        assert!(!adjacent(Nth, Coast::None, Nwy, Coast::None, UnitType::Army));
        assert!(!adjacent(Boh, Coast::None, Mun, Coast::None, UnitType::Fleet));
    }

    #[test]
    fn split_coast_fleet_edges() {
        // Marseilles touches only the south coast of Spain.
        assert!(adjacent(Mar, Coast::None, Spa, Coast::South, UnitType::Fleet));
        assert!(!adjacent(Mar, Coast::None, Spa, Coast::North, UnitType::Fleet));
        // A fleet on Spain's north coast cannot reach the Gulf of Lyon.
        assert!(adjacent(Spa, Coast::South, Gol, Coast::None, UnitType::Fleet));
        assert!(!adjacent(Spa, Coast::North, Gol, Coast::None, UnitType::Fleet));
        // Armies ignore coasts entirely.
        assert!(adjacent(Gas, Coast::None, Spa, Coast::None, UnitType::Army));
    }

    #[test]
    fn fleet_coast_options() {
        let coasts = fleet_coasts_between(Mao, Coast::None, Spa);
        assert!(coasts.contains(&Coast::North));
        assert!(coasts.contains(&Coast::South));
        assert_eq!(fleet_coasts_between(Mar, Coast::None, Spa), vec![Coast::South]);
        assert!(fleet_coasts_between(Par, Coast::None, Spa).is_empty());
    }

    #[test]
    fn neighbors_are_sorted_and_deduplicated() {
        let n = neighbors(Mao, Coast::None, UnitType::Fleet);
        let mut sorted = n.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(n, sorted);
        // Spain appears once even though two coasts border MAO.
        assert_eq!(n.iter().filter(|p| **p == Spa).count(), 1);
    }
}
