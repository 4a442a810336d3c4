//! End-to-end checks: random instances through the simulator, the encoder,
//! and the decoder.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing_subscriber::{fmt, EnvFilter};

use u_qubo_schedule::decode::{decode_schedule, Decoder, DecoderConfig, ReplayOrder};
use u_qubo_schedule::models::{ConflictMatrix, OptimizerOutput, RunRecord, Task, Variable};
use u_qubo_schedule::qubo::{encode, EncoderConfig, QuboEncoder};
use u_qubo_schedule::scheduler::{simulate, ScheduleKpi};
use u_qubo_schedule::validation::validate_schedule;

fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

fn random_task(rng: &mut SmallRng, n: usize, machines: usize, conflict_rate: f64) -> Task {
    let lengths: Vec<f64> = (0..n).map(|_| rng.random_range(0.5..10.0)).collect();
    let mut pairs = Vec::new();
    for a in 0..n {
        for b in (a + 1)..n {
            if rng.random_bool(conflict_rate) {
                pairs.push((a, b));
            }
        }
    }
    let conflicts = ConflictMatrix::from_pairs(n, &pairs).unwrap();
    Task::new(machines, lengths, conflicts).unwrap()
}

fn random_order(rng: &mut SmallRng, n: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);
    order
}

#[test]
fn test_simulated_order_round_trips() {
    let mut rng = SmallRng::seed_from_u64(7);
    for _ in 0..50 {
        let n = rng.random_range(1..12);
        let machines = rng.random_range(1..4);
        let task = random_task(&mut rng, n, machines, 0.3);
        let order = random_order(&mut rng, n);

        let schedule = simulate(&task, &order).unwrap();
        assert_eq!(schedule.to_order(), order);
    }
}

#[test]
fn test_simulated_schedules_are_feasible() {
    let mut rng = SmallRng::seed_from_u64(42);
    for _ in 0..50 {
        let n = rng.random_range(1..15);
        let machines = rng.random_range(1..5);
        let task = random_task(&mut rng, n, machines, 0.4);
        let order = random_order(&mut rng, n);

        let schedule = simulate(&task, &order).unwrap();
        assert!(validate_schedule(&task, &schedule).is_ok());
        assert_eq!(schedule.transaction_count(), n);
    }
}

#[test]
fn test_decoding_schedule_variables_reproduces_schedule() {
    // Using each placement's rank within its track as its discrete start
    // gives a per-machine sequence that the decoder must replay exactly.
    let mut rng = SmallRng::seed_from_u64(3);
    for _ in 0..30 {
        let n = rng.random_range(1..10);
        let machines = rng.random_range(1..4);
        let task = random_task(&mut rng, n, machines, 0.3);
        let order = random_order(&mut rng, n);
        let schedule = simulate(&task, &order).unwrap();

        let mut names: Vec<String> = schedule
            .tracks()
            .iter()
            .enumerate()
            .flat_map(|(m, track)| {
                track
                    .transactions()
                    .iter()
                    .enumerate()
                    .map(move |(rank, t)| Variable::new(t.transaction_id, m, rank).name())
            })
            .collect();
        names.shuffle(&mut rng);

        let decoded = decode_schedule(&names, &task).unwrap();
        assert_eq!(decoded, schedule);
    }
}

#[test]
fn test_encoding_is_deterministic() {
    let mut rng = SmallRng::seed_from_u64(11);
    let task = random_task(&mut rng, 6, 2, 0.3);
    let encoder = QuboEncoder::new(EncoderConfig::new().with_number_time_steps(5));
    let first = encoder.encode(&task).unwrap();
    let second = encoder.encode(&task).unwrap();
    assert_eq!(first.to_named(), second.to_named());
    assert_eq!(first.offset().to_bits(), second.offset().to_bits());
}

#[test]
fn test_brute_force_minimum_decodes_to_feasible_schedule() {
    init_test();
    // Lengths [1, 1, 2] on two machines with T0/T1 conflicting. With unit
    // steps H = 2, so there are ten variables.
    let conflicts = ConflictMatrix::from_pairs(3, &[(0, 1)]).unwrap();
    let task = Task::new(2, vec![1.0, 1.0, 2.0], conflicts)
        .unwrap()
        .with_id(5);
    let qubo = encode(&task, Some(1.0), None).unwrap();
    let vars: Vec<Variable> = qubo.variables().into_iter().collect();
    assert_eq!(vars.len(), 10);

    let mut best: Option<(f64, Vec<Variable>)> = None;
    for mask in 0u32..(1 << vars.len()) {
        let active: Vec<Variable> = vars
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, v)| *v)
            .collect();
        let energy = qubo.energy(&active);
        if best.as_ref().map_or(true, |(e, _)| energy < *e) {
            best = Some((energy, active));
        }
    }
    let (energy, active) = best.unwrap();
    // Every penalty is at least 1; the preference bias of three variables is not.
    assert!(energy < 1.0);
    assert_eq!(active.len(), 3);

    let names: Vec<String> = active.iter().map(Variable::name).collect();
    assert_eq!(qubo.energy_of_names(&names).unwrap(), energy);

    for replay in [ReplayOrder::Chronological, ReplayOrder::InsertionLifo] {
        let decoder = Decoder::new(DecoderConfig::new().with_replay(replay));
        let schedule = decoder.decode_schedule(&names, &task).unwrap();
        assert!(validate_schedule(&task, &schedule).is_ok());
        assert_eq!(schedule.makespan(), 2.0);

        let kpi = ScheduleKpi::calculate(&schedule);
        assert_eq!(kpi.makespan, 2.0);
    }

    let record = RunRecord::new(
        "toy",
        task.id(),
        "brute_force",
        OptimizerOutput {
            active_vars: names.clone(),
            energy,
        },
        0.0,
    );
    let parsed = RunRecord::from_json_line(&record.to_json_line().unwrap()).unwrap();
    assert_eq!(parsed.task_id, 5);
    assert_eq!(parsed.vars, names);
}
