//! Tests for the pin pass, link relaxation and sphere collision

use clothsim_core::tests::test_helpers::{approx_eq_f32, vec3_approx_eq};
use clothsim_core::{
    Cloth, ClothError, ConstraintSolver, DistanceConstraint, ParticleState, PinConstraint, SphereCollider,
    Topology,
};
use glam::Vec3;

/// A sphere nothing can touch
fn no_sphere() -> SphereCollider {
    SphereCollider {
        center: Vec3::splat(1.0e3),
        radius: 0.0,
        bias: 0.0,
    }
}

fn single_link(a: Vec3, b: Vec3, rest: f32) -> (ParticleState, Topology) {
    let state = ParticleState::from_positions(vec![a, b]);
    let topology = Topology::new(2, rest, vec![], vec![DistanceConstraint { a: 0, b: 1 }]).unwrap();
    (state, topology)
}

fn link_error(state: &ParticleState, rest: f32) -> f32 {
    (state.positions()[0].distance(state.positions()[1]) - rest).abs()
}

#[test]
fn test_single_link_error_never_grows() {
    let configs = [
        (Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0)),
        (Vec3::ZERO, Vec3::new(0.1, 0.2, 0.0)),
        (Vec3::new(-1.0, 2.0, 0.5), Vec3::new(0.5, -1.0, 2.0)),
        (Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 0.999)),
    ];

    for (a, b) in configs {
        let (mut state, topology) = single_link(a, b, 1.0);
        let mut before = link_error(&state, 1.0);
        for _ in 0..5 {
            ConstraintSolver::new(1, no_sphere()).solve(&mut state, &topology).unwrap();
            let after = link_error(&state, 1.0);
            assert!(after <= before + 1e-6, "error grew from {} to {}", before, after);
            before = after;
        }
        assert!(before < 1e-5);
    }
}

#[test]
fn test_free_link_moves_both_ends_symmetrically() {
    let (mut state, topology) = single_link(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), 1.0);
    ConstraintSolver::new(1, no_sphere()).solve(&mut state, &topology).unwrap();

    assert!(vec3_approx_eq(state.positions()[0], Vec3::new(0.5, 0.0, 0.0), 1e-6));
    assert!(vec3_approx_eq(state.positions()[1], Vec3::new(1.5, 0.0, 0.0), 1e-6));
}

#[test]
fn test_coincident_particles_are_skipped() {
    let (mut state, topology) = single_link(Vec3::ONE, Vec3::ONE, 1.0);
    ConstraintSolver::new(8, no_sphere()).solve(&mut state, &topology).unwrap();

    assert_eq!(state.positions()[0], Vec3::ONE);
    assert_eq!(state.positions()[1], Vec3::ONE);
    assert!(state.positions().iter().all(|p| p.is_finite()));
}

#[test]
fn test_pin_pass_restores_anchor() {
    let anchor = Vec3::new(0.0, 1.0, 0.0);
    let state_positions = vec![Vec3::new(0.3, 0.2, 0.1), Vec3::new(0.0, -1.0, 0.0)];
    let mut state = ParticleState::from_positions(state_positions);
    let topology = Topology::new(
        2,
        0.5,
        vec![PinConstraint { index: 0, anchor }],
        vec![DistanceConstraint { a: 0, b: 1 }],
    )
    .unwrap();

    ConstraintSolver::new(8, no_sphere()).solve(&mut state, &topology).unwrap();

    assert_eq!(state.positions()[0], anchor);
    assert!(approx_eq_f32(state.positions()[0].distance(state.positions()[1]), 0.5, 1e-6));
}

#[test]
fn test_particle_inside_sphere_projected_to_surface() {
    let start = Vec3::new(0.05, 0.1, -0.02);
    let mut state = ParticleState::from_positions(vec![start]);
    let topology = Topology::new(1, 1.0, vec![], vec![]).unwrap();
    let solver = ConstraintSolver::default();

    solver.solve(&mut state, &topology).unwrap();

    let p = state.positions()[0];
    let r = solver.sphere.effective_radius();
    assert!(approx_eq_f32(r, 0.21, 1e-7));
    assert!(approx_eq_f32(p.length(), r, 1e-6));
    assert!(vec3_approx_eq(p.normalize(), start.normalize(), 1e-6));
}

#[test]
fn test_particle_outside_sphere_untouched() {
    let start = Vec3::new(0.0, 0.3, 0.0);
    let mut state = ParticleState::from_positions(vec![start]);
    let topology = Topology::new(1, 1.0, vec![], vec![]).unwrap();

    ConstraintSolver::default().solve(&mut state, &topology).unwrap();

    assert_eq!(state.positions()[0], start);
}

#[test]
fn test_particle_at_sphere_center_pushed_up() {
    let mut state = ParticleState::from_positions(vec![Vec3::ZERO]);
    let topology = Topology::new(1, 1.0, vec![], vec![]).unwrap();

    ConstraintSolver::default().solve(&mut state, &topology).unwrap();

    assert!(vec3_approx_eq(state.positions()[0], Vec3::new(0.0, 0.21, 0.0), 1e-6));
}

#[test]
fn test_offset_sphere_center() {
    let sphere = SphereCollider {
        center: Vec3::new(1.0, 1.0, 1.0),
        radius: 0.5,
        bias: 0.0,
    };
    let mut state = ParticleState::from_positions(vec![Vec3::new(1.0, 1.0, 1.2)]);
    let topology = Topology::new(1, 1.0, vec![], vec![]).unwrap();

    ConstraintSolver::new(1, sphere).solve(&mut state, &topology).unwrap();

    assert!(vec3_approx_eq(state.positions()[0], Vec3::new(1.0, 1.0, 1.5), 1e-6));
}

#[test]
fn test_invariants_hold_while_draping() {
    let mut cloth = Cloth::new(32, 1.0 / 31.0, 0.5, Vec3::new(0.0, -0.5, 0.0)).unwrap();
    let r = cloth.solver().sphere.effective_radius();

    for _ in 0..240 {
        cloth.update(1.0 / 60.0);

        for pin in cloth.pins() {
            assert_eq!(cloth.positions()[pin.index], pin.anchor);
        }
        for p in cloth.positions() {
            assert!(p.length() >= r - 1e-5, "particle {:?} inside sphere", p);
        }
    }
}

#[test]
fn test_solve_is_deterministic() {
    let mut a = Cloth::new(8, 0.1, 0.3, Vec3::new(0.0, -1.0, 0.0)).unwrap();
    for _ in 0..10 {
        a.accumulate_forces();
        a.integrate(0.05);
    }
    let mut b = a.clone();

    a.solve_constraints();
    b.solve_constraints();

    assert_eq!(a.positions(), b.positions());
}

#[test]
fn test_topology_rejects_out_of_range_indices() {
    let pin = PinConstraint {
        index: 3,
        anchor: Vec3::ZERO,
    };
    assert!(matches!(
        Topology::new(1, 1.0, vec![pin], vec![]),
        Err(ClothError::IndexOutOfRange { index: 3, len: 1 })
    ));

    let link = DistanceConstraint { a: 0, b: 2 };
    assert!(matches!(
        Topology::new(2, 1.0, vec![], vec![link]),
        Err(ClothError::IndexOutOfRange { index: 2, len: 2 })
    ));
}

#[test]
fn test_solve_rejects_mismatched_state() {
    let larger = ParticleState::grid(3, 0.5, 1.0);
    let topology = Topology::grid(&larger, 3, 0.5).unwrap();
    let mut state = ParticleState::grid(2, 0.5, 1.0);
    let before = state.positions().to_vec();

    let result = ConstraintSolver::default().solve(&mut state, &topology);

    assert!(matches!(
        result,
        Err(ClothError::TopologyMismatch { expected: 9, actual: 4 })
    ));
    assert_eq!(state.positions(), before.as_slice());
}

#[test]
fn test_anchor_inside_sphere_keeps_pin() {
    let mut cloth = Cloth::new(4, 0.1, 0.5, Vec3::new(0.0, -0.5, 0.0)).unwrap();
    let r = cloth.solver().sphere.effective_radius();

    // Pins take precedence over the sphere; free particles are still pushed out
    cloth.set_anchor(0, Vec3::ZERO).unwrap();
    for _ in 0..30 {
        cloth.update(1.0 / 60.0);
        assert_eq!(cloth.positions()[0], Vec3::ZERO);
        for (i, p) in cloth.positions().iter().enumerate() {
            if !cloth.topology().is_pinned(i) {
                assert!(p.length() >= r - 1e-5, "free particle {} at {:?}", i, p);
            }
        }
    }
}
