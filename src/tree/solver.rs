//! Backward induction over perfect-information trees.
//!
//! # Algorithm
//!
//! Single post-order pass: a terminal node returns its payoff vector; a
//! decision node evaluates every child, then keeps the action whose child
//! value is best for the acting player.
//!
//! Ties on the acting player's payoff go to the action with the
//! lexicographically smallest id, so results are reproducible.
//!
//! Every decision node is visited exactly once, including nodes in branches
//! that are not on the equilibrium path, and each contributes a step and a
//! strategy entry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::model::{ExtensiveFormGame, GameNode, TreeAction};

/// The decision taken at one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveStep {
    /// Decision node id.
    pub node_id: String,
    /// Acting player.
    pub player: String,
    /// Id of the chosen action.
    pub chosen_action_id: String,
    /// Label of the chosen action.
    pub chosen_action_label: String,
    /// Payoff vector reached by following the chosen action.
    pub continuation_payoff: BTreeMap<String, f64>,
}

/// Subgame-perfect solution of a tree.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SolveResult {
    /// Payoff vector at the root.
    pub root_value: BTreeMap<String, f64>,
    /// Chosen action id for every decision node.
    pub strategy_by_node: BTreeMap<String, String>,
    /// Decisions in post-order: children (in action order) before parents.
    pub steps: Vec<SolveStep>,
}

impl SolveResult {
    /// Node ids visited when play follows the solved strategy from the root,
    /// ending at a terminal node.
    pub fn equilibrium_path(&self, game: &ExtensiveFormGame) -> Vec<String> {
        let mut path = Vec::new();
        let mut current = game.node(game.root());
        while let Some(node) = current {
            path.push(node.id().to_string());
            current = self
                .strategy_by_node
                .get(node.id())
                .and_then(|chosen| node.actions().iter().find(|a| &a.id == chosen))
                .and_then(|a| game.node(&a.child));
        }
        path
    }
}

struct Solver<'a> {
    game: &'a ExtensiveFormGame,
    result: SolveResult,
}

impl<'a> Solver<'a> {
    /// Value of the subtree at `id`, recording decisions along the way.
    fn evaluate(&mut self, id: &str) -> BTreeMap<String, f64> {
        let game = self.game;
        let Some(node) = game.node(id) else {
            return BTreeMap::new();
        };
        match node {
            GameNode::Terminal { payoff, .. } => payoff.by_player.clone(),
            GameNode::Decision { id, player, actions } => {
                let mut best: Option<(&TreeAction, BTreeMap<String, f64>)> = None;
                for action in actions {
                    let value = self.evaluate(&action.child);
                    let better = match &best {
                        None => true,
                        Some((chosen, incumbent)) => {
                            // validation gives every declared player a payoff at every terminal
                            let current = value[player];
                            let previous = incumbent[player];
                            current > previous || (current == previous && action.id < chosen.id)
                        }
                    };
                    if better {
                        best = Some((action, value));
                    }
                }
                // validation guarantees at least one action
                let Some((chosen, value)) = best else {
                    return BTreeMap::new();
                };
                log::trace!("node {}: {} picks '{}' ({})", id, player, chosen.id, chosen.label);
                self.result.strategy_by_node.insert(id.clone(), chosen.id.clone());
                self.result.steps.push(SolveStep {
                    node_id: id.clone(),
                    player: player.clone(),
                    chosen_action_id: chosen.id.clone(),
                    chosen_action_label: chosen.label.clone(),
                    continuation_payoff: value.clone(),
                });
                value
            }
        }
    }
}

/// Solve a perfect-information tree by backward induction.
pub fn solve_perfect_information(game: &ExtensiveFormGame) -> SolveResult {
    let mut solver = Solver {
        game,
        result: SolveResult::default(),
    };
    let root_value = solver.evaluate(game.root());
    SolveResult {
        root_value,
        ..solver.result
    }
}
