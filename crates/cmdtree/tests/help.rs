use cmdtree::{parse, Audience, CommandNode, Messages, RecordingSender};

const CLAN: &str = "
clan,c {
    help Clan commands
    create string:name {
        help Found a clan
    }
    invite,inv *string:player {
        help Invite a player
        permission clan.invite
    }
    stop {
        users console
        help Shut clans down
    }
    officer {
        hidesub
        help Officer tools
        kick string:player {
            help Remove a member
        }
    }
    _ int:_ {
        help Show clan by rank
    }
}
";

#[test]
fn test_full_help_for_console() {
    let tree = parse(CLAN).unwrap();
    let sender = RecordingSender::console().grant("*");
    assert_eq!(
        tree.help(tree.roots()[0], &sender).unwrap(),
        [
            "--[ Help for clan ]--",
            "clan: Clan commands",
            "clan|c create <string:name>: Found a clan",
            "clan|c invite <player>: Invite a player",
            "clan|c stop: Shut clans down",
            "clan|c officer: Officer tools",
            "clan|c <int>: Show clan by rank",
        ]
        .join("\n")
    );
}

#[test]
fn test_help_filters_by_sender() {
    let tree = parse(CLAN).unwrap();
    let lines = tree.help_lines(tree.roots()[0], &RecordingSender::player());
    assert_eq!(
        lines,
        vec![
            "clan: Clan commands",
            "clan|c create <string:name>: Found a clan",
            "clan|c officer: Officer tools",
            "clan|c <int>: Show clan by rank",
        ]
    );
}

#[test]
fn test_hidden_subtree_shown_from_its_own_node() {
    let tree = parse(CLAN).unwrap();
    let root = tree.node(tree.roots()[0]).unwrap();
    let officer = root.children()[3];
    assert_eq!(
        tree.help(officer, &RecordingSender::player()).unwrap(),
        "--[ Help for officer ]--\nofficer kick <string:player>: Remove a member"
    );
}

#[test]
fn test_help_shown_on_dispatch_fallback() {
    let tree = parse(CLAN).unwrap();
    let sender = RecordingSender::player();
    assert!(tree.execute(tree.roots()[0], &sender, &["create"]));
    assert_eq!(
        sender.messages(),
        vec!["--[ Help for create ]--\ncreate <string:name>: Found a clan"]
    );
}

#[test]
fn test_custom_messages() {
    let messages: Messages = serde_yaml::from_str(
        "help_header: \"== {name} ==\"\nhidden_subcommands: \"(more)\"\n",
    )
    .unwrap();
    let mut tree = cmdtree::CommandTree::new().with_messages(messages);
    let root = tree.add_root(CommandNode::new(["tools"]).help("Tools"));
    tree.add_child(root, CommandNode::new(["secret"]).hide_sub())
        .unwrap();
    tree.add_child(root, CommandNode::new(["ops"]).audience(Audience::Console).help("Ops"))
        .unwrap();
    assert_eq!(
        tree.help(root, &RecordingSender::player()).unwrap(),
        "== tools ==\ntools: Tools\ntools secret: (more)"
    );
}
