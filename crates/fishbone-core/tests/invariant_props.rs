//! Random command streams never break structural invariants

use fishbone_core::{Command, Document, FishboneConfig};
use fishbone_model::{NodeKind, TargetRef};
use proptest::prelude::*;

const IDS: [&str; 6] = ["a", "b", "c", "d", "e", "f"];
const NAMES: [&str; 3] = ["Fatigue", "fatigue", "Wear"];

fn id() -> impl Strategy<Value = String> {
    prop::sample::select(IDS.to_vec()).prop_map(str::to_string)
}

fn name() -> impl Strategy<Value = String> {
    prop::sample::select(NAMES.to_vec()).prop_map(str::to_string)
}

fn command() -> impl Strategy<Value = Command> {
    prop_oneof![
        1 => Just(Command::ClearGraph),
        6 => (id(), any::<bool>()).prop_map(|(id, problem)| {
            let title = if problem { format!("Problem {id}") } else { format!("Category {id}") };
            Command::add_node_with_id(title, id)
        }),
        2 => (id(), id()).prop_map(|(s, t)| Command::connect(s, t, None)),
        2 => (id(), prop::option::of("[a-z]{1,8}")).prop_map(|(id, title)| Command::UpdateNode {
            id,
            title,
            description: None,
        }),
        3 => (id(), name()).prop_map(|(id, n)| Command::add_cause(&TargetRef::node(id), n)),
        3 => (id(), name()).prop_map(|(id, n)| Command::add_evidence(&TargetRef::node(id), n, "log")),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn batches_preserve_invariants(batches in prop::collection::vec(prop::collection::vec(command(), 1..12), 1..6)) {
        let doc = Document::new("Problem").unwrap();
        for batch in &batches {
            doc.apply_batch(batch);
            let violations = doc.validate();
            prop_assert!(violations.is_empty(), "{violations:?}");
        }
    }

    #[test]
    fn problem_count_is_one_unless_empty(commands in prop::collection::vec(command(), 0..30)) {
        let doc = Document::empty(FishboneConfig::default()).unwrap();
        doc.apply_batch(&commands);
        let store = doc.read();
        let problems = store.nodes_of_kind(NodeKind::Problem).count();
        prop_assert!(problems == 1 || store.is_empty());
    }

    #[test]
    fn change_log_counts_applied_commands(commands in prop::collection::vec(command(), 0..20)) {
        let doc = Document::new("Problem").unwrap();
        let report = doc.apply_batch(&commands);
        prop_assert_eq!(report.reports.len(), commands.len());
        prop_assert_eq!(report.log.len(), report.applied());
    }

    #[test]
    fn cause_names_stay_unique(commands in prop::collection::vec(command(), 0..30)) {
        let doc = Document::new("Problem").unwrap();
        doc.apply_batch(&commands);
        let store = doc.read();
        for node in store.nodes() {
            let mut names: Vec<String> = node.causes.iter().map(|c| c.name.to_lowercase()).collect();
            let total = names.len();
            names.sort();
            names.dedup();
            prop_assert_eq!(names.len(), total);
        }
    }
}
