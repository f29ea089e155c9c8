use cmdtree::{parse, CommandNode, CommandTree, RecordingSender, Sender, TypeProvider};

const WORLD: &str = "
world,wo {
    tp,teleport world:target {
        help Teleport to a world
    }
    create,new string:name {
        permission world.create
    }
    console,con {
        users console
        save {
        }
    }
    _ world:target int:x int:z {
        help Jump to coordinates
    }
}
";

fn worlds() -> TypeProvider {
    TypeProvider::new("world", |s: &str| Some(s.to_string())).with_completions(|sender| {
        let mut names = vec!["Overworld".to_string(), "nether".to_string(), "end".to_string()];
        if sender.is_console() {
            names.push("staging".to_string());
        }
        names
    })
}

fn tree() -> CommandTree {
    let mut tree = parse(WORLD).unwrap();
    let root = tree.roots()[0];
    tree.register_provider(root, worlds()).unwrap();
    tree
}

#[test]
fn test_first_position_lists_named_children() {
    let tree = tree();
    let root = tree.roots()[0];
    let sender = RecordingSender::player();
    assert_eq!(
        tree.complete(root, &sender, &[""]).unwrap(),
        vec!["tp", "create", "console"]
    );
    assert_eq!(tree.complete(root, &sender, &["n"]).unwrap(), vec!["new"]);
    assert_eq!(tree.complete(root, &sender, &["ne"]).unwrap(), vec!["new"]);
}

#[test]
fn test_anonymous_child_offers_nothing() {
    let tree = tree();
    let root = tree.roots()[0];
    let sender = RecordingSender::player();
    assert_eq!(tree.complete(root, &sender, &["net"]), None);
    assert_eq!(tree.complete(root, &sender, &["o"]), None);
    assert_eq!(tree.complete(root, &sender, &["nether", ""]), None);
}

#[test]
fn test_provider_completion_is_sender_aware() {
    let tree = tree();
    let root = tree.roots()[0];
    assert_eq!(
        tree.complete(root, &RecordingSender::player(), &["tp", "s"]),
        None
    );
    assert_eq!(
        tree.complete(root, &RecordingSender::console(), &["tp", "s"]).unwrap(),
        vec!["staging"]
    );
    assert_eq!(
        tree.complete(root, &RecordingSender::player(), &["teleport", ""]).unwrap(),
        vec!["Overworld", "nether", "end"]
    );
}

#[test]
fn test_audience_restricted_subtree() {
    let tree = tree();
    let root = tree.roots()[0];
    assert_eq!(
        tree.complete(root, &RecordingSender::player(), &["console", ""]),
        None
    );
    assert_eq!(
        tree.complete(root, &RecordingSender::console(), &["con", ""]).unwrap(),
        vec!["save"]
    );
}

#[test]
fn test_argument_past_declared_count_has_no_candidates() {
    let tree = tree();
    let root = tree.roots()[0];
    assert_eq!(
        tree.complete(root, &RecordingSender::player(), &["tp", "end", ""]),
        None
    );
}

#[test]
fn test_late_child_does_not_see_provider() {
    let mut tree = tree();
    let root = tree.roots()[0];
    let late = tree
        .add_child(root, CommandNode::new(["late"]).argument(cmdtree::Argument::new("world", "w")))
        .unwrap();
    assert!(!tree.node(late).unwrap().providers().contains("world"));
    assert_eq!(
        tree.complete(late, &RecordingSender::player(), &[""]),
        None
    );
    let sender = RecordingSender::player();
    assert_eq!(tree.complete(root, &sender, &["tp", "e"]).unwrap(), vec!["end"]);
}
