use glam::Vec2;
use particle_physics::{ChargeClass, Particle};
use particle_simulation::{ConfigError, InitParams, ParticleStore, PhysicsParams, PhysicsStep, StepMode};

const MODES: [StepMode; 2] = [StepMode::Serial, StepMode::Parallel];

/// `side * side` particles on a square grid, all at rest
fn grid(side: usize, spacing: f32, class: ChargeClass) -> Vec<Particle> {
    (0..side * side)
        .map(|n| {
            let x = (n % side) as f32 * spacing;
            let y = (n / side) as f32 * spacing;
            Particle::at_rest(Vec2::new(x, y), class)
        })
        .collect()
}

fn min_pair_distance(particles: &[Particle]) -> f32 {
    let mut min = f32::INFINITY;
    for (i, a) in particles.iter().enumerate() {
        for b in &particles[i + 1..] {
            min = min.min(a.position.distance(b.position));
        }
    }
    min
}

// ==================================================================================
// Conservation and damping
// ==================================================================================

#[test]
fn inert_field_keeps_positions() {
    for mode in MODES {
        let start = grid(4, 3.0, ChargeClass::HEAVY);
        let mut store = ParticleStore::from_particles(start.clone(), 1).unwrap();
        let mut physics = PhysicsStep::new(PhysicsParams::inert().with_mode(mode)).unwrap();

        for _ in 0..100 {
            physics.step(&mut store, 0.05);
        }

        assert_eq!(store.particles(), start.as_slice(), "mode {mode:?}");
    }
}

#[test]
fn friction_decays_velocity_geometrically() {
    let friction = 0.9;
    let v0 = Vec2::new(3.0, -4.0);

    for mode in MODES {
        let particles = vec![
            Particle::new(Vec2::ZERO, v0, ChargeClass::LIGHT),
            Particle::new(Vec2::new(50.0, 0.0), v0, ChargeClass::LIGHT),
        ];
        let mut store = ParticleStore::from_particles(particles, 2).unwrap();
        let params = PhysicsParams {
            friction,
            ..PhysicsParams::inert()
        }
        .with_mode(mode);
        let mut physics = PhysicsStep::new(params).unwrap();

        for n in 1..=30 {
            physics.step(&mut store, 0.01);
            let expected = friction.powi(n) * v0.length();
            for p in store.particles() {
                assert!(
                    (p.velocity.length() - expected).abs() < 1e-4,
                    "step {n}: {} vs {expected}",
                    p.velocity.length()
                );
            }
        }
    }
}

// ==================================================================================
// Collision separation
// ==================================================================================

#[test]
fn overlap_is_resolved_in_one_step() {
    let d = 0.5;
    let contact = ChargeClass::HEAVY.radius + ChargeClass::LIGHT.radius;
    let shift = 0.5 * (contact - d);

    for mode in MODES {
        let a = Particle::at_rest(Vec2::new(1.0, 1.0), ChargeClass::HEAVY);
        let b = Particle::at_rest(Vec2::new(1.0 + d, 1.0), ChargeClass::LIGHT);
        let mut store = ParticleStore::from_particles(vec![a, b], 3).unwrap();
        let mut physics = PhysicsStep::new(PhysicsParams::inert().with_mode(mode)).unwrap();

        physics.step(&mut store, 0.1);

        let p = store.particles();
        let distance = p[0].position.distance(p[1].position);
        assert!(distance >= contact - 1e-5, "mode {mode:?}: {distance}");

        // Each body moved by half the penetration, along the connecting axis
        assert!((p[0].position - Vec2::new(1.0 - shift, 1.0)).length() < 1e-5);
        assert!((p[1].position - Vec2::new(1.0 + d + shift, 1.0)).length() < 1e-5);
    }
}

#[test]
fn pressure_does_not_collapse_like_charges() {
    for mode in MODES {
        let mut store = ParticleStore::from_particles(grid(4, 2.0, ChargeClass::LIGHT), 4).unwrap();
        let params = PhysicsParams {
            k: 0.0,
            thermal: 0.0,
            ..PhysicsParams::default()
        }
        .with_mode(mode);
        let mut physics = PhysicsStep::new(params).unwrap();

        for _ in 0..500 {
            physics.step(&mut store, 0.01);
            assert!(store.particles().iter().all(Particle::is_finite));
            assert!(min_pair_distance(store.particles()) > 0.1, "mode {mode:?}");
        }
    }
}

// ==================================================================================
// Degenerate distance
// ==================================================================================

#[test]
fn coincident_particles_stay_finite_and_separate() {
    for mode in MODES {
        let a = Particle::at_rest(Vec2::new(2.0, 2.0), ChargeClass::HEAVY);
        let b = Particle::at_rest(Vec2::new(2.0, 2.0), ChargeClass::LIGHT);
        let mut store = ParticleStore::from_particles(vec![a, b], 5).unwrap();
        let mut physics = PhysicsStep::new(PhysicsParams::default().with_mode(mode)).unwrap();

        let stats = physics.step(&mut store, 0.01);

        assert!(stats.degenerate_pairs >= 1);
        assert!(store.particles().iter().all(Particle::is_finite), "mode {mode:?}");

        let p = store.particles();
        assert!(p[0].position.x < p[1].position.x, "fallback axis separates along +x");

        for _ in 0..20 {
            physics.step(&mut store, 0.01);
        }
        assert!(store.particles().iter().all(Particle::is_finite));
    }
}

#[test]
fn coincident_points_without_radius_stay_finite() {
    let point = ChargeClass {
        charge: 1.0,
        radius: 0.0,
    };
    for mode in MODES {
        let a = Particle::at_rest(Vec2::ZERO, point);
        let b = Particle::at_rest(Vec2::ZERO, point);
        let mut store = ParticleStore::from_particles(vec![a, b], 6).unwrap();
        let mut physics = PhysicsStep::new(PhysicsParams::default().with_mode(mode)).unwrap();

        for _ in 0..10 {
            physics.step(&mut store, 0.01);
        }

        assert!(store.particles().iter().all(Particle::is_finite));
    }
}

#[test]
fn non_positive_min_distance_is_rejected() {
    for mode in MODES {
        for min_distance in [0.0, -1.0, f32::NAN] {
            let params = PhysicsParams {
                min_distance,
                ..PhysicsParams::default()
            }
            .with_mode(mode);

            assert!(matches!(
                PhysicsStep::new(params),
                Err(ConfigError::InvalidConstant {
                    name: "min_distance",
                    ..
                })
            ));
        }

        // The smallest admissible guard still keeps coincident bodies finite
        let a = Particle::at_rest(Vec2::ZERO, ChargeClass::LIGHT);
        let b = Particle::at_rest(Vec2::ZERO, ChargeClass::LIGHT);
        let mut store = ParticleStore::from_particles(vec![a, b], 8).unwrap();
        let params = PhysicsParams {
            min_distance: f32::MIN_POSITIVE,
            ..PhysicsParams::default()
        }
        .with_mode(mode);
        let mut physics = PhysicsStep::new(params).unwrap();

        physics.step(&mut store, 0.01);
        assert!(store.particles().iter().all(Particle::is_finite), "mode {mode:?}");
    }
}

// ==================================================================================
// Determinism and reference regime
// ==================================================================================

fn seeded_run(mode: StepMode, seed: u64) -> Vec<Particle> {
    let params = InitParams {
        count: 120,
        ..Default::default()
    };
    let mut store = ParticleStore::initialize(&params, Some(seed)).unwrap();
    let mut physics = PhysicsStep::new(PhysicsParams::default().with_mode(mode)).unwrap();

    for _ in 0..25 {
        physics.step(&mut store, 1.0 / 600.0);
    }
    store.particles().to_vec()
}

#[test]
fn fixed_seed_is_reproducible() {
    for mode in MODES {
        assert_eq!(seeded_run(mode, 42), seeded_run(mode, 42), "mode {mode:?}");
    }
    assert_ne!(seeded_run(StepMode::Parallel, 42), seeded_run(StepMode::Parallel, 43));
}

#[test]
fn reference_regime_stays_finite() {
    let params = InitParams {
        count: 200,
        ..Default::default()
    };
    let mut store = ParticleStore::initialize(&params, Some(7)).unwrap();
    let mut physics = PhysicsStep::new(PhysicsParams::default()).unwrap();

    // 60 fps wall time at the default simulation speed of 0.1
    for _ in 0..100 {
        physics.step(&mut store, 0.1 / 60.0);
    }

    assert_eq!(store.len(), 200);
    assert!(store.particles().iter().all(Particle::is_finite));
}
