use criterion::{black_box, criterion_group, criterion_main, Criterion};

use entente::adjudicate::adjudicate;
use entente::board::order::{Location, Order, OrderedUnit, Route};
use entente::board::province::{Coast, Power, Province::*};
use entente::board::state::{GameState, Season};
use entente::board::unit::UnitType;

fn bench_opening_holds(c: &mut Criterion) {
    let state = GameState::opening_position();
    let orders: Vec<Order> = state
        .units()
        .iter()
        .map(|u| Order::Hold {
            unit: OrderedUnit {
                unit_type: u.unit_type,
                location: Location::with_coast(u.province, u.coast),
            },
        })
        .collect();

    c.bench_function("adjudicate_22_holds", |b| {
        b.iter(|| adjudicate(black_box(&state), black_box(&orders)).unwrap())
    });
}

fn bench_contested_turn(c: &mut Criterion) {
    let mut state = GameState::new(1901, Season::Spring);
    for (power, unit_type, province) in [
        (Power::France, UnitType::Army, Par),
        (Power::France, UnitType::Army, Mar),
        (Power::France, UnitType::Army, Gas),
        (Power::Germany, UnitType::Army, Ruh),
        (Power::Germany, UnitType::Army, Mun),
        (Power::Germany, UnitType::Army, Bur),
        (Power::England, UnitType::Army, Lon),
        (Power::England, UnitType::Fleet, Nth),
        (Power::England, UnitType::Fleet, Eng),
        (Power::Italy, UnitType::Army, Pie),
        (Power::Italy, UnitType::Army, Tyr),
    ] {
        state.place_unit(power, unit_type, province, Coast::None).unwrap();
    }
    let orders = vec![
        Order::Move {
            unit: OrderedUnit::army(Par),
            dest: Location::new(Bur),
            route: Route::Auto,
        },
        Order::SupportMove { unit: OrderedUnit::army(Mar), from: Par, to: Bur },
        Order::Move {
            unit: OrderedUnit::army(Gas),
            dest: Location::new(Spa),
            route: Route::Auto,
        },
        Order::Hold { unit: OrderedUnit::army(Bur) },
        Order::SupportHold { unit: OrderedUnit::army(Ruh), at: Bur },
        Order::Move {
            unit: OrderedUnit::army(Mun),
            dest: Location::new(Tyr),
            route: Route::Auto,
        },
        Order::Move {
            unit: OrderedUnit::army(Lon),
            dest: Location::new(Bel),
            route: Route::Auto,
        },
        Order::Convoy { unit: OrderedUnit::fleet(Nth), from: Lon, to: Bel },
        Order::Convoy { unit: OrderedUnit::fleet(Eng), from: Lon, to: Bel },
        Order::Move {
            unit: OrderedUnit::army(Pie), dest: Location::new(Mar),
            route: Route::Auto,
        },
        Order::Move {
            unit: OrderedUnit::army(Tyr),
            dest: Location::new(Mun),
            route: Route::Auto,
        },
    ];

    c.bench_function("adjudicate_contested_turn", |b| {
        b.iter(|| adjudicate(black_box(&state), black_box(&orders)).unwrap())
    });
}

criterion_group!(benches, bench_opening_holds, bench_contested_turn);
criterion_main!(benches);
