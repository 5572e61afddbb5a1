//! Finite perfect-information game trees.
//!
//! A tree is stored as a flat list of nodes addressed by string id, the same
//! shape it has on the wire:
//!
//! ```json
//! {
//!   "root": "n0",
//!   "players": ["P1", "P2"],
//!   "nodes": [
//!     {"id": "n0", "node_type": "decision", "player": "P1",
//!      "actions": [{"id": "a", "label": "Left", "child": "t1"}]},
//!     {"id": "t1", "node_type": "terminal", "payoff": {"by_player": {"P1": 1, "P2": 0}}}
//!   ]
//! }
//! ```
//!
//! Construction (and deserialization) checks that the nodes form a tree
//! rooted at `root`, so the solver never has to.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::game::GameError;

/// An edge from a decision node to one of its children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeAction {
    /// Identifier, unique within the owning node; used for tie-breaking.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Id of the node this action leads to.
    pub child: String,
}

impl TreeAction {
    /// Create an action.
    pub fn new(id: impl Into<String>, label: impl Into<String>, child: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            child: child.into(),
        }
    }
}

/// Payoff vector of a terminal node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TerminalPayoff {
    /// Payoff per player id.
    pub by_player: BTreeMap<String, f64>,
}

/// A node of the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node_type", rename_all = "lowercase")]
pub enum GameNode {
    /// A node where `player` picks one of `actions`.
    Decision {
        /// Node id.
        id: String,
        /// Acting player.
        player: String,
        /// Available moves, in display order.
        actions: Vec<TreeAction>,
    },
    /// A leaf carrying a payoff for every player.
    Terminal {
        /// Node id.
        id: String,
        /// Payoffs at this leaf.
        payoff: TerminalPayoff,
    },
}

impl GameNode {
    /// Build a decision node.
    pub fn decision(id: impl Into<String>, player: impl Into<String>, actions: Vec<TreeAction>) -> Self {
        GameNode::Decision {
            id: id.into(),
            player: player.into(),
            actions,
        }
    }

    /// Build a terminal node from `(player, payoff)` pairs.
    pub fn terminal<P: Into<String>>(id: impl Into<String>, payoffs: impl IntoIterator<Item = (P, f64)>) -> Self {
        GameNode::Terminal {
            id: id.into(),
            payoff: TerminalPayoff {
                by_player: payoffs.into_iter().map(|(p, v)| (p.into(), v)).collect(),
            },
        }
    }

    /// The node's id.
    pub fn id(&self) -> &str {
        match self {
            GameNode::Decision { id, .. } | GameNode::Terminal { id, .. } => id,
        }
    }

    /// Outgoing actions; empty for terminal nodes.
    pub fn actions(&self) -> &[TreeAction] {
        match self {
            GameNode::Decision { actions, .. } => actions,
            GameNode::Terminal { .. } => &[],
        }
    }

    /// True for leaves.
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameNode::Terminal { .. })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ExtensiveFormRepr {
    root: String,
    players: Vec<String>,
    nodes: Vec<GameNode>,
}

/// A validated perfect-information game tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ExtensiveFormRepr", into = "ExtensiveFormRepr")]
pub struct ExtensiveFormGame {
    root: String,
    players: Vec<String>,
    nodes: Vec<GameNode>,
    index: FxHashMap<String, usize>,
}

impl ExtensiveFormGame {
    /// Validate and build a tree.
    ///
    /// Rejects duplicate or empty ids, a missing root, undeclared players,
    /// empty or duplicate actions, dangling children, incomplete or
    /// non-finite terminal payoffs, and anything that is not a tree rooted at
    /// `root` (shared children, cycles, unreachable nodes).
    pub fn new(root: impl Into<String>, players: Vec<String>, nodes: Vec<GameNode>) -> Result<Self, GameError> {
        let root = root.into();

        if players.is_empty() {
            return Err(GameError::malformed("a tree needs at least one player"));
        }
        let declared: HashSet<&str> = players.iter().map(String::as_str).collect();
        if declared.len() != players.len() || declared.contains("") {
            return Err(GameError::malformed("player ids must be non-empty and distinct"));
        }
        if nodes.is_empty() {
            return Err(GameError::malformed("a tree needs at least one node"));
        }

        let mut index = FxHashMap::default();
        for (i, node) in nodes.iter().enumerate() {
            if node.id().is_empty() {
                return Err(GameError::malformed("node ids must be non-empty"));
            }
            if index.insert(node.id().to_string(), i).is_some() {
                return Err(GameError::malformed(format!("duplicate node id '{}'", node.id())));
            }
        }
        if !index.contains_key(&root) {
            return Err(GameError::malformed(format!("root node '{}' does not exist", root)));
        }

        let mut parents = vec![0usize; nodes.len()];
        for node in &nodes {
            match node {
                GameNode::Decision { id, player, actions } => {
                    if !declared.contains(player.as_str()) {
                        return Err(GameError::malformed(format!(
                            "node '{}' is owned by undeclared player '{}'",
                            id, player
                        )));
                    }
                    if actions.is_empty() {
                        return Err(GameError::malformed(format!("decision node '{}' has no actions", id)));
                    }
                    let mut seen = HashSet::new();
                    for action in actions {
                        if action.id.is_empty() || !seen.insert(action.id.as_str()) {
                            return Err(GameError::malformed(format!(
                                "action id '{}' in node '{}' is empty or repeated",
                                action.id, id
                            )));
                        }
                        let child = index.get(&action.child).ok_or_else(|| {
                            GameError::malformed(format!(
                                "action '{}' in node '{}' points to unknown child '{}'",
                                action.id, id, action.child
                            ))
                        })?;
                        parents[*child] += 1;
                    }
                }
                GameNode::Terminal { id, payoff } => {
                    for player in &players {
                        match payoff.by_player.get(player) {
                            Some(v) if v.is_finite() => {}
                            Some(_) => {
                                return Err(GameError::malformed(format!(
                                    "terminal '{}' has a non-finite payoff for '{}'",
                                    id, player
                                )))
                            }
                            None => {
                                return Err(GameError::malformed(format!(
                                    "terminal '{}' has no payoff for '{}'",
                                    id, player
                                )))
                            }
                        }
                    }
                    if let Some(extra) = payoff.by_player.keys().find(|p| !declared.contains(p.as_str())) {
                        return Err(GameError::malformed(format!(
                            "terminal '{}' pays undeclared player '{}'",
                            id, extra
                        )));
                    }
                }
            }
        }

        if parents[index[&root]] != 0 {
            return Err(GameError::malformed("the root is the child of another node"));
        }
        if let Some(shared) = parents.iter().position(|&n| n > 1) {
            return Err(GameError::malformed(format!(
                "node '{}' is reached by more than one action",
                nodes[shared].id()
            )));
        }

        // Every node has at most one parent and the root has none, so any
        // cycle is disconnected from the root and shows up here.
        let mut reached = vec![false; nodes.len()];
        let mut stack = vec![index[&root]];
        while let Some(i) = stack.pop() {
            reached[i] = true;
            stack.extend(nodes[i].actions().iter().map(|a| index[&a.child]));
        }
        if let Some(lost) = reached.iter().position(|r| !r) {
            return Err(GameError::malformed(format!(
                "node '{}' is unreachable from the root or lies on a cycle",
                nodes[lost].id()
            )));
        }

        Ok(Self {
            root,
            players,
            nodes,
            index,
        })
    }

    /// Id of the root node.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Declared player ids, in input order.
    pub fn players(&self) -> &[String] {
        &self.players
    }

    /// All nodes, in input order.
    pub fn nodes(&self) -> &[GameNode] {
        &self.nodes
    }

    /// Look a node up by id.
    pub fn node(&self, id: &str) -> Option<&GameNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Parse and validate a tree from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, GameError> {
        serde_json::from_str(json).map_err(|e| GameError::malformed(e.to_string()))
    }

    /// Read, parse and validate a tree from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, GameError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            GameError::malformed(format!("failed to read '{}': {}", path.as_ref().display(), e))
        })?;
        Self::from_json_str(&content)
    }
}

impl TryFrom<ExtensiveFormRepr> for ExtensiveFormGame {
    type Error = GameError;

    fn try_from(repr: ExtensiveFormRepr) -> Result<Self, Self::Error> {
        ExtensiveFormGame::new(repr.root, repr.players, repr.nodes)
    }
}

impl From<ExtensiveFormGame> for ExtensiveFormRepr {
    fn from(game: ExtensiveFormGame) -> Self {
        ExtensiveFormRepr {
            root: game.root,
            players: game.players,
            nodes: game.nodes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn players() -> Vec<String> {
        vec!["P1".to_string(), "P2".to_string()]
    }

    fn leaf(id: &str, p1: f64, p2: f64) -> GameNode {
        GameNode::terminal(id, [("P1", p1), ("P2", p2)])
    }

    fn small_nodes() -> Vec<GameNode> {
        vec![
            GameNode::decision(
                "n0",
                "P1",
                vec![TreeAction::new("a", "Left", "t1"), TreeAction::new("b", "Right", "t2")],
            ),
            leaf("t1", 1.0, 0.0),
            leaf("t2", 0.0, 1.0),
        ]
    }

    fn expect_malformed(result: Result<ExtensiveFormGame, GameError>) {
        assert!(matches!(result, Err(GameError::MalformedGame(_))), "{:?}", result);
    }

    #[test]
    fn test_valid_tree() {
        let game = ExtensiveFormGame::new("n0", players(), small_nodes()).unwrap();
        assert_eq!(game.root(), "n0");
        assert!(game.node("t1").unwrap().is_terminal());
        assert_eq!(game.node("n0").unwrap().actions().len(), 2);
        assert!(game.node("zz").is_none());
    }

    #[test]
    fn test_duplicate_node_id() {
        let mut nodes = small_nodes();
        nodes.push(leaf("t1", 2.0, 2.0));
        expect_malformed(ExtensiveFormGame::new("n0", players(), nodes));
    }

    #[test]
    fn test_missing_root_and_dangling_child() {
        expect_malformed(ExtensiveFormGame::new("nope", players(), small_nodes()));

        let mut nodes = small_nodes();
        nodes[0] = GameNode::decision("n0", "P1", vec![TreeAction::new("a", "Left", "ghost")]);
        expect_malformed(ExtensiveFormGame::new("n0", players(), nodes));
    }

    #[test]
    fn test_empty_actions_rejected() {
        let nodes = vec![GameNode::decision("n0", "P1", vec![])];
        expect_malformed(ExtensiveFormGame::new("n0", players(), nodes));
    }

    #[test]
    fn test_duplicate_action_id_rejected() {
        let mut nodes = small_nodes();
        nodes[0] = GameNode::decision(
            "n0",
            "P1",
            vec![TreeAction::new("a", "Left", "t1"), TreeAction::new("a", "Right", "t2")],
        );
        expect_malformed(ExtensiveFormGame::new("n0", players(), nodes));
    }

    #[test]
    fn test_undeclared_player_and_missing_payoff() {
        let mut nodes = small_nodes();
        nodes[0] = GameNode::decision("n0", "P3", vec![TreeAction::new("a", "Left", "t1")]);
        expect_malformed(ExtensiveFormGame::new("n0", players(), nodes));

        let mut nodes = small_nodes();
        nodes[1] = GameNode::terminal("t1", [("P1", 1.0)]);
        expect_malformed(ExtensiveFormGame::new("n0", players(), nodes));

        let mut nodes = small_nodes();
        nodes[1] = leaf("t1", f64::NAN, 0.0);
        expect_malformed(ExtensiveFormGame::new("n0", players(), nodes));
    }

    #[test]
    fn test_shared_child_rejected() {
        let mut nodes = small_nodes();
        nodes[0] = GameNode::decision(
            "n0",
            "P1",
            vec![TreeAction::new("a", "Left", "t1"), TreeAction::new("b", "Right", "t1")],
        );
        expect_malformed(ExtensiveFormGame::new("n0", players(), nodes));
    }

    #[test]
    fn test_cycle_and_unreachable_rejected() {
        // n1 <-> n2 hang off nothing
        let mut nodes = small_nodes();
        nodes.push(GameNode::decision("n1", "P2", vec![TreeAction::new("x", "X", "n2")]));
        nodes.push(GameNode::decision("n2", "P2", vec![TreeAction::new("y", "Y", "n1")]));
        expect_malformed(ExtensiveFormGame::new("n0", players(), nodes));

        // back edge to the root
        let nodes = vec![
            GameNode::decision("n0", "P1", vec![TreeAction::new("a", "A", "n1")]),
            GameNode::decision("n1", "P2", vec![TreeAction::new("b", "B", "n0")]),
        ];
        expect_malformed(ExtensiveFormGame::new("n0", players(), nodes));

        let mut nodes = small_nodes();
        nodes.push(leaf("orphan", 0.0, 0.0));
        expect_malformed(ExtensiveFormGame::new("n0", players(), nodes));
    }

    #[test]
    fn test_json_shape() {
        let json = r#"{
            "root": "n0",
            "players": ["P1", "P2"],
            "nodes": [
                {"id": "n0", "node_type": "decision", "player": "P1",
                 "actions": [{"id": "a", "label": "Left", "child": "t1"}]},
                {"id": "t1", "node_type": "terminal", "payoff": {"by_player": {"P1": 1, "P2": 0}}}
            ]
        }"#;
        let game = ExtensiveFormGame::from_json_str(json).unwrap();
        assert_eq!(game.nodes().len(), 2);

        let value = serde_json::to_value(&game).unwrap();
        assert_eq!(value["nodes"][1]["node_type"], "terminal");
        assert_eq!(value["nodes"][0]["actions"][0]["child"], "t1");
        let back: ExtensiveFormGame = serde_json::from_value(value).unwrap();
        assert_eq!(back, game);
    }

    #[test]
    fn test_json_validation_applies() {
        let json = r#"{"root": "n0", "players": ["P1"], "nodes": [
            {"id": "n0", "node_type": "decision", "player": "P1", "actions": []}
        ]}"#;
        assert!(ExtensiveFormGame::from_json_str(json).is_err());
    }
}
