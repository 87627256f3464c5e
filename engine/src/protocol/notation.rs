//! Order notation parsing and formatting.
//!
//! Orders are entered one line per unit, relative to the prompted unit:
//!
//! ```text
//! H                      hold
//! - bur                  move (origin implied)
//! par - bur              move (origin spelled out)
//! S mar                  support the unit in mar to hold
//! S par - bur            support the move from par to bur
//! C gre - smy            convoy the army moving from gre to smy
//! ```
//!
//! Unit-type letters before provinces (`A par - bur`) are accepted and
//! ignored, coasts are written `spa/nc`, and everything is
//! case-insensitive. A move may end in `vc` to request the convoy route
//! explicitly. Parsing is purely syntactic plus an origin check; whether
//! an order is achievable is the adjudicator's business.

use thiserror::Error;

use crate::board::order::{Location, Order, OrderedUnit, Route};
use crate::board::province::{Coast, Province};
#[cfg(test)]
use crate::board::unit::UnitType;
use crate::board::unit::Unit;

/// Errors parsing one order line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotationError {
    #[error("empty order")]
    Empty,

    #[error("unknown province '{0}'")]
    UnknownProvince(String),

    #[error("unknown coast '{0}'")]
    UnknownCoast(String),

    #[error("order names {found} but the unit is in {expected}")]
    WrongOrigin { expected: &'static str, found: &'static str },

    #[error("expected {expected}, found '{found}'")]
    UnexpectedToken { expected: &'static str, found: String },

    #[error("incomplete order, expected {0}")]
    UnexpectedEnd(&'static str),
}

/// Parses one order line issued to `unit`.
pub fn parse_order(input: &str, unit: &Unit) -> Result<Order, NotationError> {
    let lower = input.trim().to_ascii_lowercase();
    let tokens: Vec<&str> = lower.split_whitespace().collect();
    if tokens.is_empty() {
        return Err(NotationError::Empty);
    }

    let me = OrderedUnit {
        unit_type: unit.unit_type,
        location: Location::with_coast(unit.province, unit.coast),
    };

    let mut pos = 0;
    // Optional `A par` / `f stp/sc` prefix naming the ordered unit itself.
    pos = skip_unit_letter(&tokens, pos);
    if let Some(loc) = try_location(&tokens, pos) {
        let loc = loc?;
        if loc.province != unit.province {
            return Err(NotationError::WrongOrigin {
                expected: unit.province.abbr(),
                found: loc.province.abbr(),
            });
        }
        pos += 1;
    }

    let action = *tokens
        .get(pos)
        .ok_or(NotationError::UnexpectedEnd("an action (H, -, S, C)"))?;
    match action {
        "h" | "hold" => {
            expect_end(&tokens, pos + 1)?;
            Ok(Order::Hold { unit: me })
        }

        "-" => {
            let dest = location(&tokens, pos + 1)?;
            let route = match tokens.get(pos + 2) {
                None => Route::Auto,
                Some(&"vc") => {
                    expect_end(&tokens, pos + 3)?;
                    Route::ViaConvoy
                }
                Some(other) => {
                    return Err(NotationError::UnexpectedToken {
                        expected: "end of order or 'vc'",
                        found: (*other).to_string(),
                    })
                }
            };
            Ok(Order::Move { unit: me, dest, route })
        }

        "s" => {
            let pos = skip_unit_letter(&tokens, pos + 1);
            let first = location(&tokens, pos)?;
            match tokens.get(pos + 1) {
                None => Ok(Order::SupportHold { unit: me, at: first.province }),
                Some(&"h") => {
                    expect_end(&tokens, pos + 2)?;
                    Ok(Order::SupportHold { unit: me, at: first.province })
                }
                Some(&"-") => {
                    let dest = location(&tokens, pos + 2)?;
                    expect_end(&tokens, pos + 3)?;
                    Ok(Order::SupportMove {
                        unit: me,
                        from: first.province,
                        to: dest.province,
                    })
                }
                Some(other) => Err(NotationError::UnexpectedToken {
                    expected: "'H', '-', or end of order",
                    found: (*other).to_string(),
                }),
            }
        }

        "c" => {
            let pos = skip_unit_letter(&tokens, pos + 1);
            let from = location(&tokens, pos)?;
            match tokens.get(pos + 1) {
                Some(&"-") => {
                    let to = location(&tokens, pos + 2)?;
                    expect_end(&tokens, pos + 3)?;
                    Ok(Order::Convoy {
                        unit: me,
                        from: from.province,
                        to: to.province,
                    })
                }
                Some(other) => Err(NotationError::UnexpectedToken {
                    expected: "'-'",
                    found: (*other).to_string(),
                }),
                None => Err(NotationError::UnexpectedEnd("'-' and a destination")),
            }
        }

        other => Err(NotationError::UnexpectedToken {
            expected: "H, -, S, or C",
            found: other.to_string(),
        }),
    }
}

/// Renders an order back into canonical notation.
pub fn format_order(order: &Order) -> String {
    let unit = order.unit();
    let prefix = format!(
        "{} {}",
        unit.unit_type.letter(),
        format_location(unit.location)
    );
    match *order {
        Order::Hold { .. } => format!("{prefix} H"),
        Order::Move { dest, route, .. } => {
            let tail = match route {
                Route::Auto => String::new(),
                Route::ViaConvoy => " vc".to_string(),
            };
            format!("{prefix} - {}{tail}", format_location(dest))
        }
        Order::SupportHold { at, .. } => format!("{prefix} S {}", at.abbr()),
        Order::SupportMove { from, to, .. } => {
            format!("{prefix} S {} - {}", from.abbr(), to.abbr())
        }
        Order::Convoy { from, to, .. } => {
            format!("{prefix} C {} - {}", from.abbr(), to.abbr())
        }
    }
}

fn format_location(loc: Location) -> String {
    match loc.coast {
        Coast::None => loc.province.abbr().to_string(),
        coast => format!("{}/{}", loc.province.abbr(), coast.tag()),
    }
}

/// Skips a standalone `a`/`f` token when a location follows it.
fn skip_unit_letter(tokens: &[&str], pos: usize) -> usize {
    if matches!(tokens.get(pos), Some(&"a") | Some(&"f"))
        && matches!(try_location(tokens, pos + 1), Some(Ok(_)))
    {
        pos + 1
    } else {
        pos
    }
}

/// Parses the token at `pos` as a location if it looks like one.
fn try_location(tokens: &[&str], pos: usize) -> Option<Result<Location, NotationError>> {
    let token = *tokens.get(pos)?;
    let (prov, coast) = match token.split_once('/') {
        Some((p, c)) => (p, Some(c)),
        None => (token, None),
    };
    let province = Province::from_abbr(prov)?;
    match coast {
        None => Some(Ok(Location::new(province))),
        Some(tag) => match Coast::from_tag(tag) {
            Some(c) if c != Coast::None => Some(Ok(Location::with_coast(province, c))),
            _ => Some(Err(NotationError::UnknownCoast(tag.to_string()))),
        },
    }
}

/// Parses the token at `pos` as a location, required.
fn location(tokens: &[&str], pos: usize) -> Result<Location, NotationError> {
    match tokens.get(pos) {
        None => Err(NotationError::UnexpectedEnd("a province")),
        Some(token) => match try_location(tokens, pos) {
            Some(result) => result,
            None => Err(NotationError::UnknownProvince((*token).to_string())),
        },
    }
}

fn expect_end(tokens: &[&str], pos: usize) -> Result<(), NotationError> {
    match tokens.get(pos) {
        None => Ok(()),
        Some(extra) => Err(NotationError::UnexpectedToken {
            expected: "end of order",
            found: (*extra).to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::province::{Power, Province::*};
    use crate::board::unit::UnitId;

    fn unit(unit_type: UnitType, province: Province) -> Unit {
        Unit {
            id: UnitId(0),
            power: Power::France,
            unit_type,
            province,
            coast: Coast::None,
        }
    }

    #[test]
    fn parses_hold() {
        let u = unit(UnitType::Army, Par);
        assert_eq!(
            parse_order("H", &u).unwrap(),
            Order::Hold { unit: OrderedUnit::army(Par) }
        );
        assert_eq!(
            parse_order("a par h", &u).unwrap(),
            Order::Hold { unit: OrderedUnit::army(Par) }
        );
    }

    #[test]
    fn parses_move_with_and_without_origin() {
        let u = unit(UnitType::Army, Par);
        let expected = Order::Move {
            unit: OrderedUnit::army(Par),
            dest: Location::new(Bur),
            route: Route::Auto,
        };
        assert_eq!(parse_order("- bur", &u).unwrap(), expected);
        assert_eq!(parse_order("par - bur", &u).unwrap(), expected);
        assert_eq!(parse_order("A PAR - BUR", &u).unwrap(), expected);
    }

    #[test]
    fn parses_move_with_coast() {
        let u = unit(UnitType::Fleet, Nrg);
        let order = parse_order("- stp/nc", &u).unwrap();
        assert_eq!(
            order,
            Order::Move {
                unit: OrderedUnit::fleet(Nrg),
                dest: Location::with_coast(Stp, Coast::North),
                route: Route::Auto,
            }
        );
    }

    #[test]
    fn parses_via_convoy_flag() {
        let u = unit(UnitType::Army, Lon);
        let order = parse_order("- nwy vc", &u).unwrap();
        assert!(matches!(order, Order::Move { route: Route::ViaConvoy, .. }));
    }

    #[test]
    fn parses_support_hold_forms() {
        let u = unit(UnitType::Army, Tyr);
        let expected = Order::SupportHold { unit: OrderedUnit::army(Tyr), at: Vie };
        assert_eq!(parse_order("S vie", &u).unwrap(), expected);
        assert_eq!(parse_order("s a vie", &u).unwrap(), expected);
        assert_eq!(parse_order("s vie h", &u).unwrap(), expected);
        assert_eq!(parse_order("a tyr s vie", &u).unwrap(), expected);
    }

    #[test]
    fn parses_support_move() {
        let u = unit(UnitType::Army, Gal);
        assert_eq!(
            parse_order("S bud - rum", &u).unwrap(),
            Order::SupportMove { unit: OrderedUnit::army(Gal), from: Bud, to: Rum }
        );
    }

    #[test]
    fn parses_convoy() {
        let u = unit(UnitType::Fleet, Nth);
        assert_eq!(
            parse_order("C lon - nwy", &u).unwrap(),
            Order::Convoy { unit: OrderedUnit::fleet(Nth), from: Lon, to: Nwy }
        );
        assert_eq!(
            parse_order("c a lon - nwy", &u).unwrap(),
            Order::Convoy { unit: OrderedUnit::fleet(Nth), from: Lon, to: Nwy }
        );
    }

    #[test]
    fn rejects_wrong_origin() {
        let u = unit(UnitType::Army, Par);
        assert_eq!(
            parse_order("bur - par", &u).unwrap_err(),
            NotationError::WrongOrigin { expected: "par", found: "bur" }
        );
    }

    #[test]
    fn rejects_garbage() {
        let u = unit(UnitType::Army, Par);
        assert_eq!(parse_order("", &u).unwrap_err(), NotationError::Empty);
        assert!(matches!(
            parse_order("- xyz", &u).unwrap_err(),
            NotationError::UnknownProvince(_)
        ));
        assert!(matches!(
            parse_order("- spa/wc", &u).unwrap_err(),
            NotationError::UnknownCoast(_)
        ));
        assert!(matches!(
            parse_order("x bur", &u).unwrap_err(),
            NotationError::UnexpectedToken { .. }
        ));
        assert!(matches!(
            parse_order("- bur extra", &u).unwrap_err(),
            NotationError::UnexpectedToken { .. }
        ));
    }

    #[test]
    fn format_roundtrips_through_parse() {
        let fleet = unit(UnitType::Fleet, Nth);
        let army = unit(UnitType::Army, Par);
        let orders = [
            (Order::Hold { unit: OrderedUnit::army(Par) }, &army),
            (
                Order::Move {
                    unit: OrderedUnit::army(Par),
                    dest: Location::new(Bur),
                    route: Route::Auto,
                },
                &army,
            ),
            (Order::SupportHold { unit: OrderedUnit::army(Par), at: Bre }, &army),
            (Order::SupportMove { unit: OrderedUnit::fleet(Nth), from: Lon, to: Nwy }, &fleet),
            (Order::Convoy { unit: OrderedUnit::fleet(Nth), from: Lon, to: Nwy }, &fleet),
        ];
        for (order, u) in orders {
            let text = format_order(&order);
            assert_eq!(parse_order(&text, u).unwrap(), order, "through {text:?}");
        }
    }
}
