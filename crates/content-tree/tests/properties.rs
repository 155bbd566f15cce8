use content_tree::prelude::*;
use proptest::prelude::*;

/// A file path made of folder segments `d0`..`d2` and a unique file name
fn file_list() -> impl Strategy<Value = Vec<(String, u64)>> {
    prop::collection::vec((prop::collection::vec(0..3u8, 0..4), 0..1_000u64), 1..24).prop_map(
        |files| {
            files
                .into_iter()
                .enumerate()
                .map(|(i, (folders, size))| {
                    let mut path: Vec<String> = folders.iter().map(|d| format!("d{d}")).collect();
                    path.push(format!("f{i}"));
                    (path.join("/"), size)
                })
                .collect()
        },
    )
}

fn concrete_priority() -> impl Strategy<Value = Priority> {
    prop_oneof![
        Just(Priority::IGNORED),
        Just(Priority::NORMAL),
        Just(Priority::HIGH),
        Just(Priority::MAXIMUM),
    ]
}

#[derive(Debug, Clone)]
enum Op {
    /// Set a priority on the n-th node (modulo node count)
    SetPriority(usize, Priority),
    /// Set a completed fraction on the n-th file (modulo file count)
    SetProgress(usize, f64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<usize>(), concrete_priority()).prop_map(|(n, p)| Op::SetPriority(n, p)),
        (any::<usize>(), 0.0..=1.0f64).prop_map(|(n, f)| Op::SetProgress(n, f)),
    ]
}

fn apply(tree: &mut ContentTree, op: &Op) {
    match *op {
        Op::SetPriority(n, priority) => {
            let id = NodeId::new(n % tree.node_count());
            tree.set_priority(id, priority);
        }
        Op::SetProgress(n, fraction) => {
            let id = tree.file(n % tree.file_count()).unwrap();
            tree.set_progress(id, fraction).unwrap();
        }
    }
}

/// Check every aggregate invariant on every non-root folder
fn check_invariants(tree: &ContentTree) -> Result<(), TestCaseError> {
    for id in tree.walk(TraversalOrder::PreOrder) {
        let node = tree.get(id).unwrap();
        prop_assert!(node.total_done() <= node.size(), "{} over-complete", node.name());
        if tree.is_root(id) || node.is_file() {
            continue;
        }

        let children: Vec<&Node> = tree
            .children(id)
            .iter()
            .map(|&child| tree.get(child).unwrap())
            .collect();
        let counted = || children.iter().filter(|c| !c.priority().is_ignored());

        prop_assert_eq!(node.size(), counted().map(|c| c.size()).sum::<u64>());
        prop_assert_eq!(node.total_done(), counted().map(|c| c.total_done()).sum::<u64>());

        if let Some(first) = children.first() {
            let uniform = children.iter().all(|c| c.priority() == first.priority());
            let expected = if uniform {
                first.priority()
            } else {
                Priority::PARTIAL
            };
            prop_assert_eq!(node.priority(), expected, "folder {}", node.name());
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn built_trees_satisfy_invariants(files in file_list()) {
        let tree = ContentTree::from_files(files, TreeOptions::default()).unwrap();
        check_invariants(&tree)?;
    }

    #[test]
    fn invariants_hold_after_every_mutation(
        files in file_list(),
        ops in prop::collection::vec(op(), 1..40),
    ) {
        let mut tree = ContentTree::from_files(files, TreeOptions::default()).unwrap();
        for op in &ops {
            apply(&mut tree, op);
            check_invariants(&tree)?;
        }
    }

    #[test]
    fn incremental_updates_match_a_full_refresh(
        files in file_list(),
        ops in prop::collection::vec(op(), 1..40),
    ) {
        let mut tree = ContentTree::from_files(files, TreeOptions::default()).unwrap();
        for op in &ops {
            apply(&mut tree, op);
        }

        let mut refreshed = tree.clone();
        refreshed.refresh_aggregates();
        prop_assert_eq!(tree.render(), refreshed.render());
    }

    #[test]
    fn setting_a_priority_twice_changes_nothing(
        files in file_list(),
        ops in prop::collection::vec(op(), 0..20),
        target in any::<usize>(),
        priority in concrete_priority(),
    ) {
        let mut tree = ContentTree::from_files(files, TreeOptions::default()).unwrap();
        for op in &ops {
            apply(&mut tree, op);
        }
        // The root always pushes down, so pick a non-root node
        let id = NodeId::new(1 + target % (tree.node_count() - 1));

        tree.set_priority(id, priority);
        let once = tree.render();
        tree.set_priority(id, priority);
        prop_assert_eq!(tree.render(), once);
    }

    #[test]
    fn concrete_folder_priority_reaches_every_descendant(
        files in file_list(),
        target in any::<usize>(),
        priority in concrete_priority(),
    ) {
        let mut tree = ContentTree::from_files(files, TreeOptions::default()).unwrap();
        let id = NodeId::new(target % tree.node_count());
        tree.set_priority(id, priority);

        for descendant in tree.walk_from(id, TraversalOrder::PreOrder).skip(1) {
            prop_assert_eq!(tree.get(descendant).unwrap().priority(), priority);
        }
    }

    #[test]
    fn bulk_priorities_match_single_updates(
        files in file_list(),
        seed in prop::collection::vec(concrete_priority(), 24),
    ) {
        let bulk_input = files.clone();
        let mut single = ContentTree::from_files(files, TreeOptions::default()).unwrap();
        let priorities = &seed[..single.file_count()];
        for (index, &priority) in priorities.iter().enumerate() {
            let id = single.file(index).unwrap();
            single.set_priority(id, priority);
        }

        let bulk = ContentTree::from_files_with_priorities(
            bulk_input,
            priorities,
            TreeOptions::default(),
        )
        .unwrap();
        prop_assert_eq!(single.files_priority(), bulk.files_priority());
        prop_assert_eq!(single.render(), bulk.render());
    }
}
