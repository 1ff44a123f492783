//! Builds a [`ControlFlowGraph`] from a function definition's body by walking the AST
//! statement list recursively, tracking the dangling "tails" (node, edge-kind) pairs that
//! the next statement gets wired into. Driven directly off tree structure rather than a
//! positional block list, so nested branches/loops of arbitrary depth fall out naturally.

use petgraph::graph::{DiGraph, NodeIndex};

use crate::features::ast::domain::{AstNodeId, AstTree, SyntaxKind};
use crate::features::cfg::domain::{CfgEdgeKind, CfgNode, CfgNodeKind, ControlFlowGraph};
use crate::features::cfg::ports::CfgBuilderPort;

pub struct AstCfgBuilder;

impl AstCfgBuilder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AstCfgBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CfgBuilderPort for AstCfgBuilder {
    fn build(&self, tree: &AstTree, func_def: AstNodeId) -> ControlFlowGraph {
        build_cfg(tree, func_def)
    }
}

/// A dangling edge out of the subgraph built so far: the source node and the edge kind it
/// should be connected with once the next node is known.
type Tails = Vec<(NodeIndex, CfgEdgeKind)>;

struct LoopFrame {
    header: NodeIndex,
    break_tails: Tails,
}

struct Builder<'a> {
    graph: DiGraph<CfgNode, CfgEdgeKind>,
    tree: &'a AstTree,
    exit: NodeIndex,
    loop_stack: Vec<LoopFrame>,
}

pub fn build_cfg(tree: &AstTree, func_def: AstNodeId) -> ControlFlowGraph {
    let mut graph = DiGraph::new();
    let entry = graph.add_node(CfgNode {
        kind: CfgNodeKind::Entry,
        stmt: None,
    });
    let exit = graph.add_node(CfgNode {
        kind: CfgNodeKind::Exit,
        stmt: None,
    });
    let mut builder = Builder {
        graph,
        tree,
        exit,
        loop_stack: Vec::new(),
    };

    let body_stmts = tree
        .child_by_field(func_def, "body")
        .map(|b| tree.node(b).children.clone())
        .unwrap_or_default();

    let tails = builder.process_stmts(&body_stmts, vec![(entry, CfgEdgeKind::Sequential)]);
    builder.wire(&tails, exit);

    ControlFlowGraph {
        graph: builder.graph,
        entry,
        exit,
    }
}

impl<'a> Builder<'a> {
    fn new_stmt_node(&mut self, stmt: AstNodeId) -> NodeIndex {
        self.graph.add_node(CfgNode {
            kind: CfgNodeKind::Statement,
            stmt: Some(stmt),
        })
    }

    /// Connect every tail to `target` using each tail's own recorded edge kind.
    fn wire(&mut self, tails: &Tails, target: NodeIndex) {
        for &(from, kind) in tails {
            self.graph.add_edge(from, target, kind);
        }
    }

    /// Connect every tail to `target`, overriding the recorded kind (used for loop-back
    /// edges, where the tail's own kind describes how control left the loop body, not how it
    /// returns to the header).
    fn wire_forced(&mut self, tails: &Tails, target: NodeIndex, kind: CfgEdgeKind) {
        for &(from, _) in tails {
            self.graph.add_edge(from, target, kind);
        }
    }

    fn process_stmts(&mut self, stmts: &[AstNodeId], preds: Tails) -> Tails {
        let mut tails = preds;
        for &stmt in stmts {
            tails = self.process_one(stmt, tails);
        }
        tails
    }

    fn process_one(&mut self, stmt: AstNodeId, preds: Tails) -> Tails {
        let raw_kind = self.tree.node(stmt).raw_kind.clone();
        match self.tree.node(stmt).kind {
            SyntaxKind::IfStmt => self.process_if(stmt, preds),
            SyntaxKind::ForStmt | SyntaxKind::WhileStmt => self.process_loop(stmt, preds),
            // Explicit return/raise nodes get no outgoing edge at all: they are exits in
            // their own right, not routed through the function's single implicit-fallthrough
            // exit node. A branch whose arms both terminate this way shares no common
            // post-dominator below the branch itself, so it correctly ends up with no IPD.
            SyntaxKind::ReturnStmt => {
                let n = self.new_stmt_node(stmt);
                self.wire(&preds, n);
                Vec::new()
            }
            _ if raw_kind == "raise_statement" => {
                let n = self.new_stmt_node(stmt);
                self.wire(&preds, n);
                Vec::new()
            }
            _ if raw_kind == "break_statement" => {
                let n = self.new_stmt_node(stmt);
                self.wire(&preds, n);
                if let Some(frame) = self.loop_stack.last_mut() {
                    frame.break_tails.push((n, CfgEdgeKind::LoopExit));
                }
                Vec::new()
            }
            _ if raw_kind == "continue_statement" => {
                let n = self.new_stmt_node(stmt);
                self.wire(&preds, n);
                if let Some(frame) = self.loop_stack.last() {
                    self.graph.add_edge(n, frame.header, CfgEdgeKind::LoopBack);
                }
                Vec::new()
            }
            _ => {
                let n = self.new_stmt_node(stmt);
                self.wire(&preds, n);
                vec![(n, CfgEdgeKind::Sequential)]
            }
        }
    }

    fn process_if(&mut self, if_id: AstNodeId, preds: Tails) -> Tails {
        let cond_node = self.new_stmt_node(if_id);
        self.wire(&preds, cond_node);

        let consequence_stmts = self
            .tree
            .child_by_field(if_id, "consequence")
            .map(|c| self.tree.node(c).children.clone())
            .unwrap_or_default();
        let true_tails = self.process_stmts(&consequence_stmts, vec![(cond_node, CfgEdgeKind::True)]);

        let alt = self.tree.child_by_field(if_id, "alternative");
        let false_tails = match alt.map(|a| (a, self.tree.node(a).raw_kind.clone())) {
            Some((alt_id, k)) if k == "elif_clause" => {
                self.process_if(alt_id, vec![(cond_node, CfgEdgeKind::False)])
            }
            Some((alt_id, k)) if k == "else_clause" => {
                let else_stmts = self
                    .tree
                    .child_by_field(alt_id, "body")
                    .map(|b| self.tree.node(b).children.clone())
                    .unwrap_or_default();
                self.process_stmts(&else_stmts, vec![(cond_node, CfgEdgeKind::False)])
            }
            _ => vec![(cond_node, CfgEdgeKind::False)],
        };

        let mut tails = true_tails;
        tails.extend(false_tails);
        tails
    }

    fn process_loop(&mut self, loop_id: AstNodeId, preds: Tails) -> Tails {
        let header = self.new_stmt_node(loop_id);
        self.wire(&preds, header);

        self.loop_stack.push(LoopFrame {
            header,
            break_tails: Vec::new(),
        });

        let body_stmts = self
            .tree
            .child_by_field(loop_id, "body")
            .map(|b| self.tree.node(b).children.clone())
            .unwrap_or_default();
        let body_tails = self.process_stmts(&body_stmts, vec![(header, CfgEdgeKind::True)]);
        self.wire_forced(&body_tails, header, CfgEdgeKind::LoopBack);

        let frame = self.loop_stack.pop().expect("pushed above");
        let mut tails = vec![(header, CfgEdgeKind::False)];
        tails.extend(frame.break_tails);
        tails
    }
}
