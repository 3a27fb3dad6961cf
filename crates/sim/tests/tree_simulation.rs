//! Integration tests for simulating sequences along trees.

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use treesim_sim::errors::SimulationError;
use treesim_sim::evolution::{MutationMode, SiFit3, SubstitutionModel};
use treesim_sim::simulation::{
    simulate_tree, Configuration, ExecutionConfig, ModelConfig, Simulation, TreeSimulator,
};
use treesim_sim::tree::Tree;

const EXAMPLE: &str = "((A:0.5,B:0.5)D:0.5,C:1)E;";

fn diff(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).filter(|(x, y)| x != y).count()
}

#[test]
fn test_example_tree_workflow() {
    let tree = Tree::from_newick(EXAMPLE).unwrap();
    let model = SiFit3::new(3.0, 2.0).unwrap();
    let length = 64;

    for mode in [MutationMode::Expm, MutationMode::Poisson] {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(2024);
        let result = simulate_tree(&tree, &model, length, mode, &mut rng).unwrap();

        let mut keys: Vec<_> = result.keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["A", "B", "C", "D", "E"]);

        for (name, seq) in &result {
            assert_eq!(seq.len(), length, "node {name}");
            assert!(seq.chars().all(|c| model.alphabet().contains(c)));
        }
    }
}

#[test]
fn test_parent_child_differences_bounded_by_events() {
    let tree = Tree::from_newick(EXAMPLE).unwrap();
    let model = SiFit3::new(3.0, 2.0).unwrap();

    for seed in 0..20 {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let result = TreeSimulator::new(&tree, &model, 100, MutationMode::Poisson)
            .run(&mut rng)
            .unwrap();

        for (child, parent) in [("D", "E"), ("C", "E"), ("A", "D"), ("B", "D")] {
            let changed = diff(&result.sequences[child], &result.sequences[parent]);
            assert!(
                changed <= result.events[child],
                "{child}: {changed} differing sites but {} events",
                result.events[child]
            );
        }
    }
}

#[test]
fn test_same_seed_same_sequences() {
    let config = Configuration {
        tree: EXAMPLE.to_string(),
        model: ModelConfig::SiFit3 {
            lambda_d: 3.0,
            lambda_l: 2.0,
        },
        execution: ExecutionConfig::new(50, MutationMode::Poisson, Some(7)),
    };

    let first = Simulation::new(config.clone()).unwrap().run().unwrap();
    let second = Simulation::new(config).unwrap().run().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_different_seeds_differ() {
    let tree = Tree::from_newick(EXAMPLE).unwrap();
    let model = SiFit3::new(3.0, 2.0).unwrap();
    let mut rng1 = Xoshiro256PlusPlus::seed_from_u64(1);
    let mut rng2 = Xoshiro256PlusPlus::seed_from_u64(2);
    let a = simulate_tree(&tree, &model, 200, MutationMode::Expm, &mut rng1).unwrap();
    let b = simulate_tree(&tree, &model, 200, MutationMode::Expm, &mut rng2).unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_deep_caterpillar_tree() {
    // A 2000-deep ladder exercises the explicit worklist.
    let mut tree = Tree::new();
    let mut parent = tree.add_root("n0", None);
    for i in 1..2000 {
        tree.add_child(parent, format!("leaf{i}"), 0.01);
        parent = tree.add_child(parent, format!("n{i}"), 0.01);
    }

    let model = SiFit3::new(1.0, 1.0).unwrap();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
    let result = simulate_tree(&tree, &model, 5, MutationMode::Poisson, &mut rng).unwrap();
    assert_eq!(result.len(), tree.len());
}

#[test]
fn test_deep_newick_caterpillar() {
    let depth = 10_000;
    let mut newick = "(".repeat(depth);
    newick.push_str("L0:0.01");
    for i in 1..=depth {
        newick.push_str(&format!(",L{i}:0.01)I{i}:0.01"));
    }
    newick.push(';');

    let tree = Tree::from_newick(&newick).unwrap();
    let model = SiFit3::new(3.0, 2.0).unwrap();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(4);
    let result = simulate_tree(&tree, &model, 2, MutationMode::Poisson, &mut rng).unwrap();
    assert_eq!(result.len(), 2 * depth + 1);
    assert_eq!(result["L0"].len(), 2);
}

#[test]
fn test_duplicate_names_rejected() {
    let tree = Tree::from_newick("((A:1,B:1)X:1,(C:1,D:1)X:1)R;").unwrap();
    let model = SiFit3::new(3.0, 2.0).unwrap();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
    let err = simulate_tree(&tree, &model, 10, MutationMode::Expm, &mut rng).unwrap_err();
    assert_eq!(err, SimulationError::InvalidTree("duplicate node name 'X'".into()));
}

#[test]
fn test_unnamed_nodes_rejected() {
    let model = SiFit3::new(3.0, 2.0).unwrap();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
    for newick in ["(A:1,B:1);", "((A:1,B:1):1,C:1)R;"] {
        let tree = Tree::from_newick(newick).unwrap();
        assert!(matches!(
            simulate_tree(&tree, &model, 10, MutationMode::Expm, &mut rng),
            Err(SimulationError::InvalidTree(_))
        ));
    }
}

#[test]
fn test_empty_tree_rejected() {
    let model = SiFit3::new(3.0, 2.0).unwrap();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
    assert!(matches!(
        simulate_tree(&Tree::new(), &model, 10, MutationMode::Expm, &mut rng),
        Err(SimulationError::InvalidTree(_))
    ));
}

#[test]
fn test_malformed_newick_in_configuration() {
    let config = Configuration {
        tree: "((A:1,B:1)D:1,C:1".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        Simulation::new(config),
        Err(SimulationError::Newick(_))
    ));
}

#[test]
fn test_configuration_file_roundtrip() {
    let dir = std::env::temp_dir().join(format!("treesim_config_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("config.json");

    let mut config = Configuration::default();
    config.execution.seed = Some(5);
    config.execution.replicates = 2;
    config.save(&path).unwrap();

    let loaded = Configuration::from_json_file(&path).unwrap();
    assert_eq!(loaded, config);
    let results = Simulation::new(loaded).unwrap().run().unwrap();
    assert_eq!(results.len(), 2);

    std::fs::remove_dir_all(&dir).ok();
}
