//! # Leg Inverse Kinematics Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quad_lib::{
    data_store::DataStore,
    gait_ctrl::{self, GaitCmd, GaitCtrl, GaitPattern},
    leg_ctrl::{self, Leg, LegConfig, LegCtrl, LegGeometry, LegId},
};
use servo_ctrl::{ServoCtrl, SimServoDriver};

fn leg_ik_benchmark(c: &mut Criterion) {
    // ---- Single leg ----

    let mut leg = Leg::new(
        LegGeometry::default(),
        LegConfig {
            id: LegId::FrontLeft,
            centre_deg: [135.0, 75.0, 134.0],
            channels: [0, 1, 2],
        },
    );

    c.bench_function("Leg::solve", |b| {
        b.iter(|| leg.solve(black_box(20.0), black_box(39.3), black_box(170.0)))
    });

    // ---- Full control cycle ----

    let gait_params: gait_ctrl::Params =
        util::params::from_str(include_str!("../../params/gait_ctrl.toml")).unwrap();
    let leg_params: leg_ctrl::Params =
        util::params::from_str(include_str!("../../params/leg_ctrl.toml")).unwrap();

    let mut ds = DataStore::new(
        GaitCtrl::from_params(gait_params).unwrap(),
        LegCtrl::from_params(leg_params).unwrap(),
    );
    let mut servos = ServoCtrl::new(SimServoDriver::default(), servo_ctrl::Params::default())
        .unwrap();

    ds.command(GaitCmd::Walk(GaitPattern::Trot));

    c.bench_function("DataStore::cycle::trot", |b| {
        b.iter(|| ds.cycle(&mut servos).unwrap())
    });
}

criterion_group!(benches, leg_ik_benchmark);
criterion_main!(benches);
