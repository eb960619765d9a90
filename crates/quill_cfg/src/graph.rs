//! Basic blocks and edges of one lowered body.

use quill_core::collections::{FxHashSet, FxMap};
use quill_ir::printer;
use quill_ir::{BoundBlockStatement, BoundExpression, BoundStatement, SymbolId};
use std::collections::VecDeque;
use std::fmt::{self, Write};
use std::ops::Range;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct BlockId(pub u32);

impl BlockId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Start,
    End,
    Body,
}

#[derive(Debug)]
pub struct BasicBlock<'a> {
    pub id: BlockId,
    pub kind: BlockKind,
    /// Statements of the block; empty for Start and End.
    pub statements: &'a [BoundStatement],
    /// Position of `statements` within the body.
    pub span: Range<usize>,
    pub incoming: Vec<usize>,
    pub outgoing: Vec<usize>,
}

impl<'a> BasicBlock<'a> {
    fn new(id: BlockId, kind: BlockKind, statements: &'a [BoundStatement], span: Range<usize>) -> Self {
        Self {
            id,
            kind,
            statements,
            span,
            incoming: Vec::new(),
            outgoing: Vec::new(),
        }
    }

    pub fn last(&self) -> Option<&'a BoundStatement> {
        self.statements.last()
    }

    pub fn ends_in_return(&self) -> bool {
        matches!(self.last(), Some(BoundStatement::Return(_)))
    }
}

/// The condition under which a conditional edge is taken.
#[derive(Debug, Clone, Copy)]
pub struct EdgeCondition<'a> {
    pub expression: &'a BoundExpression,
    pub when: bool,
}

#[derive(Debug)]
pub struct Edge<'a> {
    pub from: BlockId,
    pub to: BlockId,
    pub condition: Option<EdgeCondition<'a>>,
}

/// A control-flow graph with an explicit Start and End block.
///
/// Start is always block 0 and End is always block 1. Falling off the end
/// of the body and every `return` lead to End.
#[derive(Debug)]
pub struct ControlFlowGraph<'a> {
    blocks: Vec<BasicBlock<'a>>,
    edges: Vec<Edge<'a>>,
}

impl<'a> ControlFlowGraph<'a> {
    pub const START: BlockId = BlockId(0);
    pub const END: BlockId = BlockId(1);

    pub fn build(body: &'a BoundBlockStatement) -> Self {
        let statements = body.statements.as_slice();
        let mut graph = Self {
            blocks: vec![
                BasicBlock::new(Self::START, BlockKind::Start, &[], 0..0),
                BasicBlock::new(Self::END, BlockKind::End, &[], 0..0),
            ],
            edges: Vec::new(),
        };

        // 1. Split the body into runs. A run starts at a label and ends
        //    after a jump or return.
        let mut start = 0;
        for (i, statement) in statements.iter().enumerate() {
            if matches!(statement, BoundStatement::Label(_)) && i > start {
                graph.push_block(statements, start..i);
                start = i;
            }
            if matches!(
                statement,
                BoundStatement::Goto(_) | BoundStatement::ConditionalGoto { .. } | BoundStatement::Return(_)
            ) {
                graph.push_block(statements, start..i + 1);
                start = i + 1;
            }
        }
        if start < statements.len() {
            graph.push_block(statements, start..statements.len());
        }

        // 2. Index the blocks that begin with a label.
        let mut block_of_label: FxMap<SymbolId, BlockId> = FxMap::default();
        for block in graph.body_blocks() {
            if let Some(BoundStatement::Label(label)) = block.statements.first() {
                block_of_label.insert(label.id, block.id);
            }
        }

        // 3. Connect them.
        let first = graph.body_blocks().next().map_or(Self::END, |b| b.id);
        graph.connect(Self::START, first, None);

        let ids: Vec<BlockId> = graph.body_blocks().map(|b| b.id).collect();
        for (position, &id) in ids.iter().enumerate() {
            let next = ids.get(position + 1).copied().unwrap_or(Self::END);
            let target_of = |label_id: SymbolId| block_of_label.get(&label_id).copied().unwrap_or(Self::END);
            match graph.blocks[id.index()].last() {
                Some(BoundStatement::Goto(label)) => {
                    graph.connect(id, target_of(label.id), None);
                }
                Some(BoundStatement::ConditionalGoto {
                    label,
                    condition,
                    jump_if_true,
                }) => {
                    let taken = EdgeCondition {
                        expression: condition,
                        when: *jump_if_true,
                    };
                    let not_taken = EdgeCondition {
                        expression: condition,
                        when: !*jump_if_true,
                    };
                    graph.connect(id, target_of(label.id), Some(taken));
                    graph.connect(id, next, Some(not_taken));
                }
                Some(BoundStatement::Return(_)) => graph.connect(id, Self::END, None),
                _ => graph.connect(id, next, None),
            }
        }
        graph
    }

    fn push_block(&mut self, statements: &'a [BoundStatement], span: Range<usize>) {
        let id = BlockId(self.blocks.len() as u32);
        let block = BasicBlock::new(id, BlockKind::Body, &statements[span.clone()], span);
        self.blocks.push(block);
    }

    fn connect(&mut self, from: BlockId, to: BlockId, condition: Option<EdgeCondition<'a>>) {
        let edge = self.edges.len();
        self.edges.push(Edge { from, to, condition });
        self.blocks[from.index()].outgoing.push(edge);
        self.blocks[to.index()].incoming.push(edge);
    }

    pub fn blocks(&self) -> &[BasicBlock<'a>] {
        &self.blocks
    }

    pub fn edges(&self) -> &[Edge<'a>] {
        &self.edges
    }

    pub fn block(&self, id: BlockId) -> &BasicBlock<'a> {
        &self.blocks[id.index()]
    }

    /// Blocks holding statements, in body order.
    pub fn body_blocks(&self) -> impl Iterator<Item = &BasicBlock<'a>> {
        self.blocks.iter().filter(|b| b.kind == BlockKind::Body)
    }

    /// Blocks reachable from Start, found breadth-first.
    pub fn reachable(&self) -> FxHashSet<BlockId> {
        let mut live: FxHashSet<BlockId> = FxHashSet::default();
        let mut queue: VecDeque<BlockId> = VecDeque::new();
        queue.push_back(Self::START);
        while let Some(id) = queue.pop_front() {
            if live.insert(id) {
                for &edge in &self.block(id).outgoing {
                    queue.push_back(self.edges[edge].to);
                }
            }
        }
        live
    }

    /// True when every reachable edge into End leaves a block ending in `return`.
    pub fn all_paths_return(&self) -> bool {
        let live = self.reachable();
        self.block(Self::END)
            .incoming
            .iter()
            .map(|&edge| self.block(self.edges[edge].from))
            .filter(|block| live.contains(&block.id))
            .all(BasicBlock::ends_in_return)
    }

    /// Render the graph in Graphviz `dot` syntax.
    pub fn write_dot<W: Write>(&self, out: &mut W) -> fmt::Result {
        out.write_str("digraph G {\n")?;
        for block in &self.blocks {
            let mut text = String::new();
            match block.kind {
                BlockKind::Start => text.push_str("<Start>"),
                BlockKind::End => text.push_str("<End>"),
                BlockKind::Body => {
                    for statement in block.statements {
                        printer::write_statement(&mut text, statement)?;
                    }
                }
            }
            writeln!(out, "    N{} [label = \"{}\", shape = box]", block.id.0, escape(&text))?;
        }
        for edge in &self.edges {
            write!(out, "    N{} -> N{}", edge.from.0, edge.to.0)?;
            if let Some(condition) = edge.condition {
                let mut text = String::new();
                if !condition.when {
                    text.push_str("not ");
                }
                printer::write_expression(&mut text, condition.expression)?;
                write!(out, " [label = \"{}\"]", escape(&text))?;
            }
            out.write_str("\n")?;
        }
        out.write_str("}\n")
    }
}

fn escape(text: &str) -> String {
    text.trim_end()
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\l")
}
