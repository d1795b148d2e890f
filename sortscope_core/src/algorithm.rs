use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VizError;
use crate::sorters::{
    BitonicSorter, BubbleSorter, CocktailSorter, CombSorter, GnomeSorter, HeapSorter,
    InsertionSorter, MergeSorter, PancakeSorter, QuickSorter, SelectionSorter, StepSorter,
    TreeSorter,
};

/// Every sorting algorithm the visualizer can animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    #[default]
    Bubble,
    Selection,
    Insertion,
    Merge,
    Quick,
    Heap,
    Comb,
    Cocktail,
    Gnome,
    Tree,
    Pancake,
    Bitonic,
}

impl Algorithm {
    /// All algorithms in menu order.
    pub const ALL: [Algorithm; 12] = [
        Algorithm::Bubble,
        Algorithm::Selection,
        Algorithm::Insertion,
        Algorithm::Merge,
        Algorithm::Quick,
        Algorithm::Heap,
        Algorithm::Comb,
        Algorithm::Cocktail,
        Algorithm::Gnome,
        Algorithm::Tree,
        Algorithm::Pancake,
        Algorithm::Bitonic,
    ];

    /// The short identifier used on the command line and in history records.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Algorithm::Bubble => "bubble",
            Algorithm::Selection => "selection",
            Algorithm::Insertion => "insertion",
            Algorithm::Merge => "merge",
            Algorithm::Quick => "quick",
            Algorithm::Heap => "heap",
            Algorithm::Comb => "comb",
            Algorithm::Cocktail => "cocktail",
            Algorithm::Gnome => "gnome",
            Algorithm::Tree => "tree",
            Algorithm::Pancake => "pancake",
            Algorithm::Bitonic => "bitonic",
        }
    }

    /// Human readable name.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Algorithm::Bubble => "Bubble Sort",
            Algorithm::Selection => "Selection Sort",
            Algorithm::Insertion => "Insertion Sort",
            Algorithm::Merge => "Merge Sort",
            Algorithm::Quick => "Quick Sort",
            Algorithm::Heap => "Heap Sort",
            Algorithm::Comb => "Comb Sort",
            Algorithm::Cocktail => "Cocktail Shaker Sort",
            Algorithm::Gnome => "Gnome Sort",
            Algorithm::Tree => "Tree Sort",
            Algorithm::Pancake => "Pancake Sort",
            Algorithm::Bitonic => "Bitonic Sort",
        }
    }

    /// The step-emitting implementation behind this algorithm.
    #[must_use]
    pub fn sorter(self) -> &'static dyn StepSorter {
        match self {
            Algorithm::Bubble => &BubbleSorter,
            Algorithm::Selection => &SelectionSorter,
            Algorithm::Insertion => &InsertionSorter,
            Algorithm::Merge => &MergeSorter,
            Algorithm::Quick => &QuickSorter,
            Algorithm::Heap => &HeapSorter,
            Algorithm::Comb => &CombSorter,
            Algorithm::Cocktail => &CocktailSorter,
            Algorithm::Gnome => &GnomeSorter,
            Algorithm::Tree => &TreeSorter,
            Algorithm::Pancake => &PancakeSorter,
            Algorithm::Bitonic => &BitonicSorter,
        }
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Algorithm {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        let wanted = match wanted.as_str() {
            "shaker" => "cocktail",
            "bst" => "tree",
            other => other,
        };

        Algorithm::ALL
            .into_iter()
            .find(|a| a.id() == wanted)
            .ok_or_else(|| VizError::UnknownAlgorithm(s.to_string()))
    }
}
