use ucs_algo::{
    marginal_prices, solve, solve_units, SolveStatus, UcProblem, UcProblemBuilder, UcSolverConfig,
};
use ucs_core::{DemandSeries, Generator, GeneratorId, StorageUnit};

const TOL: f64 = 1e-4;

fn exact() -> UcSolverConfig {
    UcSolverConfig::default().with_mip_gap(0.0)
}

/// Overnight trough, midday peak.
fn daily_demand() -> Vec<f64> {
    (0..24)
        .map(|h| match h {
            0..=5 => 180.0,
            6..=10 => 280.0,
            11..=16 => 420.0,
            17..=20 => 330.0,
            _ => 220.0,
        })
        .collect()
}

fn two_unit_fleet() -> Vec<Generator> {
    vec![
        Generator::new("coal", 0.0, 300.0, 20.0),
        Generator::new("peaker", 10.0, 300.0, 100.0).with_startup_cost(500.0),
    ]
}

fn arbitrage_problem() -> UcProblem {
    UcProblemBuilder::new()
        .generators(two_unit_fleet())
        .storage(StorageUnit::new("phs", 100.0))
        .demand(daily_demand())
        .build()
        .unwrap()
}

fn assert_balanced(problem: &UcProblem, solution: &ucs_algo::UcSolution) {
    for t in 0..problem.hours() {
        let supply = solution.total_generation(t);
        let demand = problem.demand().at(t);
        assert!(
            (supply - demand).abs() < TOL,
            "hour {}: supply {} != demand {}",
            t + 1,
            supply,
            demand
        );
    }
}

#[test]
fn single_generator_flat_demand() {
    let problem = UcProblemBuilder::new()
        .generator(Generator::new("only", 0.0, 1000.0, 50.0))
        .demand(vec![600.0; 24])
        .build()
        .unwrap();

    let solution = solve(&problem, &UcSolverConfig::default()).unwrap();

    assert_eq!(solution.status, SolveStatus::Optimal);
    let objective = solution.objective.unwrap();
    assert!((objective - 720_000.0).abs() < 1e-3, "objective {objective}");

    let only = solution.generator(&GeneratorId::new("only")).unwrap();
    let commitment = only.commitment.as_ref().unwrap();
    assert!(commitment.on.iter().all(|&on| on));
    for &p in &only.generation {
        assert!((p - 600.0).abs() < TOL);
    }
}

#[test]
fn storage_shifts_energy_and_returns_to_start() {
    let problem = arbitrage_problem();
    let solution = solve(&problem, &exact()).unwrap();
    assert_eq!(solution.status, SolveStatus::Optimal);
    assert_balanced(&problem, &solution);

    let phs = solution.storage_unit(&GeneratorId::new("phs")).unwrap();
    let final_soc = phs.state_of_charge[23];
    assert!((final_soc - 200.0).abs() < TOL, "final soc {final_soc}");

    // Storage is used, and cycling loses energy.
    assert!(phs.energy_discharged() > 1.0);
    assert!(phs.energy_charged() > phs.energy_discharged());

    let peak: f64 = (11..17).map(|t| phs.net_output(t)).sum();
    assert!(peak > 0.0, "storage should generate over the midday peak");

    for s in &phs.state_of_charge {
        assert!(*s >= -TOL && *s <= 400.0 + TOL);
    }
}

#[test]
fn storage_never_increases_cost() {
    let problem = arbitrage_problem();
    let with_storage = solve(&problem, &exact()).unwrap();
    let without = solve(&problem.without_storage(), &exact()).unwrap();

    let with_cost = with_storage.objective.unwrap();
    let without_cost = without.objective.unwrap();
    assert!(
        with_cost <= without_cost + TOL,
        "with storage {with_cost} > without {without_cost}"
    );
    assert!(with_cost < without_cost, "arbitrage should pay off here");
}

#[test]
fn solving_from_parts_with_a_looser_gap() {
    let demand = DemandSeries::new(daily_demand()).unwrap();
    let solution = solve_units(
        two_unit_fleet(),
        vec![StorageUnit::new("phs", 100.0)],
        demand,
        0.05,
    )
    .unwrap();
    assert_eq!(solution.status, SolveStatus::Optimal);
    assert_eq!(solution.mip_gap, Some(0.05));
    assert_balanced(&arbitrage_problem(), &solution);
}

#[test]
fn invalid_units_are_rejected_before_solving() {
    let err = solve_units(
        vec![Generator::new("bad", 500.0, 100.0, 10.0)],
        Vec::new(),
        DemandSeries::new(vec![50.0]).unwrap(),
        0.01,
    )
    .unwrap_err();
    assert_eq!(err.field(), Some("generators[bad].p_min"));
}

#[test]
fn demand_above_capacity_is_infeasible() {
    let problem = UcProblemBuilder::new()
        .generator(Generator::new("only", 0.0, 1000.0, 50.0))
        .demand(vec![600.0, 1200.0, 600.0])
        .build()
        .unwrap();

    let solution = solve(&problem, &UcSolverConfig::default()).unwrap();

    assert_eq!(solution.status, SolveStatus::Infeasible);
    assert!(solution.objective.is_none());
    assert!(solution.generators.is_empty());
    assert!(solution.status_message.contains("exceeds installed capacity"));
}

#[test]
fn resolving_gives_the_same_answer() {
    let problem = arbitrage_problem();
    let first = solve(&problem, &exact()).unwrap();
    let second = solve(&problem, &exact()).unwrap();

    assert_eq!(first.status, second.status);
    let a = first.objective.unwrap();
    let b = second.objective.unwrap();
    assert!((a - b).abs() <= 1e-6 * a.abs().max(1.0));
}

#[test]
fn generation_respects_commitment() {
    let problem = arbitrage_problem();
    let solution = solve(&problem, &exact()).unwrap();

    for (unit, sched) in problem.generators().iter().zip(&solution.generators) {
        for (t, &p) in sched.generation.iter().enumerate() {
            if sched.is_on(t) {
                assert!(p >= unit.p_min.value() - TOL && p <= unit.p_max.value() + TOL);
            } else {
                assert!(p.abs() < TOL, "{} produces {} while off", unit.id, p);
            }
        }
    }
}

#[test]
fn minimum_up_time_holds() {
    let problem = UcProblemBuilder::new()
        .generator(Generator::new("base", 0.0, 100.0, 10.0))
        .generator(
            Generator::new("peaker", 20.0, 100.0, 50.0)
                .with_min_up_down(3, 1)
                .with_initial_status(false),
        )
        .demand(vec![80.0, 150.0, 80.0, 80.0, 80.0, 80.0])
        .build()
        .unwrap();

    let solution = solve(&problem, &exact()).unwrap();
    assert_eq!(solution.status, SolveStatus::Optimal);

    let peaker = solution.generator(&GeneratorId::new("peaker")).unwrap();
    let c = peaker.commitment.as_ref().unwrap();
    assert!(c.on[1]);
    assert_eq!(c.startups(), 1);
    for (t, &started) in c.startup.iter().enumerate() {
        if started {
            let end = (t + 3).min(c.on.len());
            assert!(c.on[t..end].iter().all(|&on| on), "on = {:?}", c.on);
        }
    }
    assert!((solution.objective.unwrap() - expected_min_up_cost()).abs() < TOL);
}

/// The peaker covers 50 MW in hour 2 and sits at its 20 MW minimum for the
/// other two hours it must stay on.
fn expected_min_up_cost() -> f64 {
    let peaker_energy = 50.0 + 20.0 + 20.0;
    let base_energy = 80.0 * 5.0 + 150.0 - peaker_energy;
    peaker_energy * 50.0 + base_energy * 10.0
}

#[test]
fn surplus_needs_simultaneous_storage_operation() {
    let build = || {
        UcProblemBuilder::new()
            .generator(Generator::new("must_run", 120.0, 120.0, 0.0).non_committable())
            .storage(StorageUnit::new("phs", 100.0))
            .demand(vec![100.0; 4])
            .build()
            .unwrap()
    };

    let loose = solve(&build(), &exact()).unwrap();
    assert_eq!(loose.status, SolveStatus::Optimal);
    assert!(!loose.simultaneous_storage().is_empty());

    let strict = solve(&build(), &exact().with_exclusive_storage(true)).unwrap();
    assert_eq!(strict.status, SolveStatus::Infeasible);
}

#[test]
fn exclusive_storage_never_pumps_and_generates_together() {
    let problem = arbitrage_problem();
    let config = exact().with_exclusive_storage(true);
    let solution = solve(&problem, &config).unwrap();
    assert_eq!(solution.status, SolveStatus::Optimal);
    assert!(solution.simultaneous_storage().is_empty());
    assert_balanced(&problem, &solution);
}

#[test]
fn prices_follow_the_marginal_unit() {
    let problem = UcProblemBuilder::new()
        .generator(Generator::new("coal", 0.0, 200.0, 20.0))
        .generator(Generator::new("gas", 0.0, 300.0, 45.0))
        .demand(vec![150.0, 350.0])
        .build()
        .unwrap();
    let config = exact();
    let solution = solve(&problem, &config).unwrap();
    let prices = marginal_prices(&problem, &solution, &config).unwrap();

    assert_eq!(prices.hourly.len(), 2);
    assert!((prices.hourly[0] - 20.0).abs() < TOL, "{:?}", prices.hourly);
    assert!((prices.hourly[1] - 45.0).abs() < TOL, "{:?}", prices.hourly);
    assert!((prices.objective - solution.objective.unwrap()).abs() < TOL);
}

#[test]
fn storage_sets_the_off_peak_price() {
    // Cheap unit is full in hour 1 because storage pumps with its headroom.
    // One more MWh of hour-1 demand is met by pumping less, which gives up
    // 0.84^2 MWh of hour-2 discharge priced at the expensive unit.
    let problem = UcProblemBuilder::new()
        .generator(Generator::new("cheap", 0.0, 100.0, 20.0).non_committable())
        .generator(Generator::new("dear", 0.0, 100.0, 60.0).non_committable())
        .storage(StorageUnit::new("phs", 100.0))
        .demand(vec![50.0, 150.0])
        .build()
        .unwrap();
    let config = exact();
    let solution = solve(&problem, &config).unwrap();
    let phs = solution.storage_unit(&GeneratorId::new("phs")).unwrap();
    assert!((phs.charge[0] - 50.0).abs() < TOL, "charge {:?}", phs.charge);

    let prices = marginal_prices(&problem, &solution, &config).unwrap();
    let opportunity = 60.0 * 0.84 * 0.84;
    assert!((prices.hourly[0] - opportunity).abs() < TOL, "{:?}", prices.hourly);
    assert!((prices.hourly[1] - 60.0).abs() < TOL, "{:?}", prices.hourly);
}

#[test]
fn minimum_down_time_holds() {
    // Zero demand in hour 2 forces the online unit off; it must then stay
    // off for three hours while the expensive unit covers the load.
    let problem = UcProblemBuilder::new()
        .generator(
            Generator::new("coal", 50.0, 200.0, 10.0)
                .with_min_up_down(1, 3)
                .with_initial_status(true),
        )
        .generator(Generator::new("gas", 0.0, 200.0, 50.0))
        .demand(vec![100.0, 0.0, 100.0, 100.0, 100.0])
        .build()
        .unwrap();

    let solution = solve(&problem, &exact()).unwrap();
    assert_eq!(solution.status, SolveStatus::Optimal);

    let coal = solution.generator(&GeneratorId::new("coal")).unwrap();
    let c = coal.commitment.as_ref().unwrap();
    assert_eq!(c.on, vec![true, false, false, false, true]);
    assert_eq!(c.shutdown, vec![false, true, false, false, false]);
    assert_eq!(c.startup, vec![false, false, false, false, true]);
    assert_eq!(c.startups(), 1);

    let expected = 200.0 * 10.0 + 200.0 * 50.0;
    assert!((solution.objective.unwrap() - expected).abs() < TOL);
}

#[test]
fn a_unit_never_starts_and_stops_in_the_same_hour() {
    let problem = UcProblemBuilder::new()
        .generator(Generator::new("coal", 0.0, 200.0, 20.0).with_initial_status(true))
        .generator(Generator::new("gas", 0.0, 300.0, 45.0).with_initial_status(false))
        .demand(vec![150.0, 350.0, 100.0, 250.0])
        .build()
        .unwrap();
    let solution = solve(&problem, &exact()).unwrap();

    for (unit, g) in problem.generators().iter().zip(&solution.generators) {
        let c = g.commitment.as_ref().unwrap();
        let mut was_on = unit.initial_status.unwrap_or(false);
        let mut expected_starts = 0;
        for t in 0..c.on.len() {
            assert!(!(c.startup[t] && c.shutdown[t]), "{} hour {}", g.id, t + 1);
            if c.on[t] && !was_on {
                expected_starts += 1;
            }
            was_on = c.on[t];
        }
        assert_eq!(c.startups(), expected_starts, "{}", g.id);
    }
}
