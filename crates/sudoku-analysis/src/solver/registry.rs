//! Static searcher registry.
//!
//! Searchers run in registry order, cheapest first, so a first-step pass
//! always reports the simplest available technique. The table is fixed at
//! compile time; callers narrow it per run through
//! [`AnalysisOptions`](super::AnalysisOptions) exclusions rather than by
//! editing the table.

use super::{als, chains, fish, intersections, singles, subsets, uniqueness, wings};
use super::AnalysisContext;
use crate::step::Category;

/// One registered technique searcher.
pub struct StepSearcher {
    pub name: &'static str,
    pub category: Category,
    pub run: fn(&mut AnalysisContext),
}

/// All searchers, ordered by ascending difficulty.
pub static SEARCHERS: &[StepSearcher] = &[
    StepSearcher {
        name: "naked single",
        category: Category::Singles,
        run: singles::find_naked_singles,
    },
    StepSearcher {
        name: "hidden single",
        category: Category::Singles,
        run: singles::find_hidden_singles,
    },
    StepSearcher {
        name: "naked pair",
        category: Category::Subsets,
        run: subsets::find_naked_pairs,
    },
    StepSearcher {
        name: "hidden pair",
        category: Category::Subsets,
        run: subsets::find_hidden_pairs,
    },
    StepSearcher {
        name: "pointing pair",
        category: Category::Intersections,
        run: intersections::find_pointing,
    },
    StepSearcher {
        name: "box/line reduction",
        category: Category::Intersections,
        run: intersections::find_box_line,
    },
    StepSearcher {
        name: "naked triple",
        category: Category::Subsets,
        run: subsets::find_naked_triples,
    },
    StepSearcher {
        name: "hidden triple",
        category: Category::Subsets,
        run: subsets::find_hidden_triples,
    },
    StepSearcher {
        name: "x-wing",
        category: Category::Fish,
        run: fish::find_x_wings,
    },
    StepSearcher {
        name: "naked quad",
        category: Category::Subsets,
        run: subsets::find_naked_quads,
    },
    StepSearcher {
        name: "hidden quad",
        category: Category::Subsets,
        run: subsets::find_hidden_quads,
    },
    StepSearcher {
        name: "swordfish",
        category: Category::Fish,
        run: fish::find_swordfish,
    },
    StepSearcher {
        name: "jellyfish",
        category: Category::Fish,
        run: fish::find_jellyfish,
    },
    StepSearcher {
        name: "xy-wing",
        category: Category::Wings,
        run: wings::find_xy_wings,
    },
    StepSearcher {
        name: "xyz-wing",
        category: Category::Wings,
        run: wings::find_xyz_wings,
    },
    StepSearcher {
        name: "w-wing",
        category: Category::Wings,
        run: wings::find_w_wings,
    },
    StepSearcher {
        name: "x-chain",
        category: Category::Chains,
        run: chains::find_x_chains,
    },
    StepSearcher {
        name: "unique rectangle",
        category: Category::Uniqueness,
        run: uniqueness::find_unique_rectangles,
    },
    StepSearcher {
        name: "als-xz",
        category: Category::Als,
        run: als::find_als_xz,
    },
    StepSearcher {
        name: "bug+1",
        category: Category::Uniqueness,
        run: uniqueness::find_bug_plus_one,
    },
    StepSearcher {
        name: "aic",
        category: Category::Chains,
        run: chains::find_aics,
    },
];
