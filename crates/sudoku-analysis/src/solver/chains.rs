//! Alternating inference chains over the candidate link graph.
//!
//! Nodes are (cell, digit) candidates. A strong link means "at least one of
//! the two is true" (conjugate pair in a house, or the two digits of a
//! bivalue cell); a weak link means "at most one is true" (shared house on
//! one digit, or two digits of one cell). A chain alternating
//! strong/weak/.../strong proves one endpoint true, yielding eliminations
//! at candidates incompatible with both endpoints.

use std::collections::VecDeque;

use super::AnalysisContext;
use crate::bitset::CellMap;
use crate::grid::Position;
use crate::step::{Conclusion, Step, StepKind, Technique, View};

/// Longest chain considered, in nodes. Chains beyond this read as noise.
const MAX_NODES: usize = 12;

#[inline]
fn node_id(cell: usize, digit: u8) -> usize {
    cell * 9 + digit as usize - 1
}

#[inline]
fn node_cell(node: usize) -> usize {
    node / 9
}

#[inline]
fn node_digit(node: usize) -> u8 {
    (node % 9) as u8 + 1
}

/// Adjacency lists over the 729 candidate nodes.
struct LinkGraph {
    strong: Vec<Vec<u16>>,
    weak: Vec<Vec<u16>>,
}

impl LinkGraph {
    /// `single_digit` restricts the graph to house links on one digit,
    /// which is exactly the X-Chain playing field.
    fn build(ctx: &AnalysisContext, single_digit: bool) -> Self {
        let mut strong = vec![Vec::new(); 729];
        let mut weak = vec![Vec::new(); 729];

        for house in 0..27 {
            for digit in 1..=9u8 {
                let spots: Vec<usize> = ctx.house_digit(house, digit).iter().collect();
                for (i, &a) in spots.iter().enumerate() {
                    for &b in &spots[i + 1..] {
                        let (na, nb) = (node_id(a, digit) as u16, node_id(b, digit) as u16);
                        weak[na as usize].push(nb);
                        weak[nb as usize].push(na);
                        if spots.len() == 2 {
                            strong[na as usize].push(nb);
                            strong[nb as usize].push(na);
                        }
                    }
                }
            }
        }

        if !single_digit {
            for cell in ctx.empty.iter() {
                let digits: Vec<u8> = ctx.candidates(cell).iter().collect();
                for (i, &a) in digits.iter().enumerate() {
                    for &b in &digits[i + 1..] {
                        let (na, nb) = (node_id(cell, a) as u16, node_id(cell, b) as u16);
                        weak[na as usize].push(nb);
                        weak[nb as usize].push(na);
                        if digits.len() == 2 {
                            strong[na as usize].push(nb);
                            strong[nb as usize].push(na);
                        }
                    }
                }
            }
        }

        // A strong link always doubles as a weak one; the house loop above
        // already records conjugate pairs in both lists.
        for list in strong.iter_mut().chain(weak.iter_mut()) {
            list.sort_unstable();
            list.dedup();
        }
        Self { strong, weak }
    }
}

/// Conclusions implied by a proven "start is true or end is true".
fn endpoint_conclusions(ctx: &AnalysisContext, start: usize, end: usize) -> Vec<Conclusion> {
    let (sc, sd) = (node_cell(start), node_digit(start));
    let (ec, ed) = (node_cell(end), node_digit(end));
    let mut conclusions = Vec::new();

    if sd == ed && sc != ec {
        // Same digit: it leaves every cell seeing both endpoints.
        let victims = ctx
            .topo
            .common_peers(sc, ec)
            .intersect(&ctx.digit_cells[(sd - 1) as usize]);
        for cell in victims.iter() {
            conclusions.push(Conclusion::Eliminate {
                pos: Position::from_index(cell),
                digit: sd,
            });
        }
    } else if sd != ed && sc == ec {
        // Same cell: one of the two digits is its value.
        for digit in ctx.candidates(sc).iter() {
            if digit != sd && digit != ed {
                conclusions.push(Conclusion::Eliminate {
                    pos: Position::from_index(sc),
                    digit,
                });
            }
        }
    } else if sd != ed && ctx.topo.sees(sc, ec) {
        // Mutually visible endpoints: each loses the other's digit.
        if ctx.candidates(sc).contains(ed) {
            conclusions.push(Conclusion::Eliminate {
                pos: Position::from_index(sc),
                digit: ed,
            });
        }
        if ctx.candidates(ec).contains(sd) {
            conclusions.push(Conclusion::Eliminate {
                pos: Position::from_index(ec),
                digit: sd,
            });
        }
    }
    conclusions
}

fn chain_step(technique: Technique, nodes: Vec<(usize, u8)>, conclusions: Vec<Conclusion>) -> Step {
    let cells: CellMap = nodes.iter().map(|&(cell, _)| cell).collect();
    Step::new(
        technique,
        StepKind::Chain { nodes },
        conclusions,
        vec![View::Cells(cells)],
    )
}

/// Breadth-first alternating search from every strongly linked node.
fn search(ctx: &mut AnalysisContext, graph: &LinkGraph, technique: Technique) {
    for start in 0..729usize {
        if graph.strong[start].is_empty() {
            continue;
        }
        // parent[node][parity]: predecessor on the alternating path; parity
        // 1 = reached through a strong link ("on").
        let mut parent = vec![[u16::MAX; 2]; 729];
        let mut queue = VecDeque::new();
        parent[start][0] = start as u16;
        queue.push_back((start as u16, 0u8, 1usize));

        while let Some((node, parity, depth)) = queue.pop_front() {
            if depth >= MAX_NODES {
                continue;
            }
            let next_links = if parity == 0 {
                &graph.strong[node as usize]
            } else {
                &graph.weak[node as usize]
            };
            let next_parity = 1 - parity;
            for &next in next_links {
                if parent[next as usize][next_parity as usize] != u16::MAX
                    || next as usize == start
                {
                    continue;
                }
                parent[next as usize][next_parity as usize] = node;
                queue.push_back((next, next_parity, depth + 1));

                // A node reached through a strong link closes a valid
                // chain; a 2-node "chain" is just the link itself.
                if next_parity == 1 && depth + 1 >= 4 {
                    let conclusions = endpoint_conclusions(ctx, start, next as usize);
                    if conclusions.is_empty() {
                        continue;
                    }
                    let nodes = rebuild_path(&parent, start, next as usize);
                    if technique == Technique::AlternatingInferenceChain
                        && nodes.iter().all(|&(_, d)| d == nodes[0].1)
                    {
                        continue;
                    }
                    if ctx.emit(chain_step(technique, nodes, conclusions)) {
                        return;
                    }
                }
            }
        }
    }
}

fn rebuild_path(parent: &[[u16; 2]], start: usize, end: usize) -> Vec<(usize, u8)> {
    let mut nodes = Vec::new();
    let mut node = end as u16;
    let mut parity = 1usize;
    loop {
        nodes.push((node_cell(node as usize), node_digit(node as usize)));
        if node as usize == start && parity == 0 {
            break;
        }
        node = parent[node as usize][parity];
        parity = 1 - parity;
    }
    nodes.reverse();
    nodes
}

/// Single-digit chains over conjugate links.
pub(crate) fn find_x_chains(ctx: &mut AnalysisContext) {
    let graph = LinkGraph::build(ctx, true);
    search(ctx, &graph, Technique::XChain);
}

/// Full alternating inference chains, bivalue and conjugate links mixed.
pub(crate) fn find_aics(ctx: &mut AnalysisContext) {
    let graph = LinkGraph::build(ctx, false);
    search(ctx, &graph, Technique::AlternatingInferenceChain);
}
