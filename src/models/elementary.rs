use std::collections::VecDeque;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::grid::Boundary;
use super::model_trait::{Model, Reportable, SerializableModel};
use crate::utils::errors::SimulationError;

use simlab_derive::SerializableModel;

/// Generations kept for rendering, the current one included.
pub const HISTORY_CAPACITY: usize = 200;
pub const MIN_LENGTH: usize = 10;

/// Expands a Wolfram rule number: entry `i` is the next state for the
/// neighborhood pattern `i = 4 * left + 2 * center + right`.
pub fn rule_table(rule: u8) -> [bool; 8] {
    let mut table = [false; 8];
    for (pattern, next) in table.iter_mut().enumerate() {
        *next = (rule >> pattern) & 1 == 1;
    }
    table
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementaryRecord {
    pub generation: u64,
    pub active: usize,
}

/// A one-dimensional, two-state automaton whose next state depends on a
/// cell and its two neighbors.  Recent generations are kept for
/// space-time rendering, oldest first.
#[derive(Debug, Clone, Serialize, SerializableModel)]
#[serde(rename_all = "camelCase")]
pub struct ElementaryAutomaton1D {
    rule: u8,
    #[serde(skip)]
    table: [bool; 8],
    boundary: Boundary,
    cells: Vec<bool>,
    #[serde(skip)]
    next: Vec<bool>,
    #[serde(skip)]
    history: VecDeque<Vec<bool>>,
    generation: u64,
}

impl ElementaryAutomaton1D {
    /// Rule numbers outside 0..=255 are clamped into range.  The strip
    /// starts from the single-seed pattern of `reset`.
    pub fn new(length: usize, rule_number: i64) -> Result<Self, SimulationError> {
        if length < MIN_LENGTH {
            return Err(SimulationError::InvalidParameter {
                name: "length",
                value: length as f64,
                reason: "must be at least 10 cells",
            });
        }
        let rule = rule_number.clamp(0, 255) as u8;
        let mut automaton = Self {
            rule,
            table: rule_table(rule),
            boundary: Boundary::default(),
            cells: vec![false; length],
            next: vec![false; length],
            history: VecDeque::with_capacity(HISTORY_CAPACITY),
            generation: 0,
        };
        automaton.reset();
        debug!("Created elementary automaton, rule {}, length {}", rule, length);
        Ok(automaton)
    }

    pub fn with_boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn set_boundary(&mut self, boundary: Boundary) {
        self.boundary = boundary;
    }

    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    /// Single active cell at the center, history restarted.
    pub fn reset(&mut self) {
        for cell in self.cells.iter_mut() {
            *cell = false;
        }
        let center = self.cells.len() / 2;
        self.cells[center] = true;
        self.history.clear();
        self.history.push_back(self.cells.clone());
        self.generation = 0;
        trace!("Reset rule {} automaton", self.rule);
    }

    fn cell(&self, index: usize, delta: isize) -> bool {
        self.boundary
            .resolve(index, delta, self.cells.len())
            .map_or(false, |neighbor| self.cells[neighbor])
    }

    pub fn step(&mut self) {
        for index in 0..self.cells.len() {
            let pattern = (usize::from(self.cell(index, -1)) << 2)
                | (usize::from(self.cells[index]) << 1)
                | usize::from(self.cell(index, 1));
            self.next[index] = self.table[pattern];
        }
        std::mem::swap(&mut self.cells, &mut self.next);
        if self.history.len() == HISTORY_CAPACITY {
            self.history.pop_front();
        }
        self.history.push_back(self.cells.clone());
        self.generation += 1;
    }

    pub fn current(&self) -> &[bool] {
        &self.cells
    }

    /// Oldest to newest; the last entry is the current generation.
    pub fn history(&self) -> &VecDeque<Vec<bool>> {
        &self.history
    }

    pub fn rule(&self) -> u8 {
        self.rule
    }

    pub fn table(&self) -> [bool; 8] {
        self.table
    }

    /// Steps since the last reset.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn active(&self) -> usize {
        self.cells.iter().filter(|cell| **cell).count()
    }
}

impl Model for ElementaryAutomaton1D {
    type Record = ElementaryRecord;

    fn step(&mut self) {
        ElementaryAutomaton1D::step(self)
    }

    fn record(&self) -> ElementaryRecord {
        ElementaryRecord {
            generation: self.generation,
            active: self.active(),
        }
    }

    fn check_invariants(&self) -> Result<(), SimulationError> {
        let newest = self.history.back().map(Vec::as_slice);
        if self.history.len() > HISTORY_CAPACITY || newest != Some(self.current()) {
            return Err(SimulationError::InvariantViolation(format!(
                "elementary history holds {} generations and must end with the current one",
                self.history.len()
            )));
        }
        Ok(())
    }
}

impl Reportable for ElementaryAutomaton1D {
    fn status(&self) -> String {
        format!("Rule {}, generation {}", self.rule, self.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(cells: &[bool]) -> String {
        cells.iter().map(|cell| if *cell { '#' } else { '.' }).collect()
    }

    #[test]
    fn rule_tables_follow_the_bits() {
        assert_eq!(rule_table(0), [false; 8]);
        assert_eq!(rule_table(255), [true; 8]);
        assert_eq!(
            rule_table(30),
            [false, true, true, true, true, false, false, false]
        );
    }

    #[test]
    fn short_strips_are_rejected_and_rules_clamped() {
        assert!(ElementaryAutomaton1D::new(9, 30).is_err());
        assert_eq!(ElementaryAutomaton1D::new(10, 300).unwrap().rule(), 255);
        assert_eq!(ElementaryAutomaton1D::new(10, -4).unwrap().rule(), 0);
    }

    #[test]
    fn construction_seeds_the_center() {
        let automaton = ElementaryAutomaton1D::new(11, 90).unwrap();
        assert_eq!(render(automaton.current()), ".....#.....");
        assert_eq!(automaton.history().len(), 1);
        assert_eq!(automaton.generation(), 0);
    }

    #[test]
    fn rule_zero_clears_everything() {
        let mut automaton = ElementaryAutomaton1D::new(20, 0).unwrap();
        automaton.step();
        assert_eq!(automaton.active(), 0);
    }

    #[test]
    fn rule_ninety_draws_the_sierpinski_triangle() {
        let mut automaton = ElementaryAutomaton1D::new(15, 90).unwrap();
        for _ in 0..4 {
            automaton.step();
        }
        let rows: Vec<String> = automaton.history().iter().map(|row| render(row)).collect();
        assert_eq!(
            rows,
            vec![
                ".......#.......",
                "......#.#......",
                ".....#...#.....",
                "....#.#.#.#....",
                "...#.......#...",
            ]
        );
    }

    #[test]
    fn clipped_and_toroidal_edges() {
        // Rule 2 shifts every active cell one place to the left
        let mut clipped = ElementaryAutomaton1D::new(10, 2).unwrap();
        let mut toroidal = ElementaryAutomaton1D::new(10, 2)
            .unwrap()
            .with_boundary(Boundary::Toroidal);
        for _ in 0..6 {
            clipped.step();
            toroidal.step();
        }
        assert_eq!(clipped.active(), 0);
        assert_eq!(render(toroidal.current()), ".........#");
    }

    #[test]
    fn history_is_capped() {
        let mut automaton = ElementaryAutomaton1D::new(64, 30).unwrap();
        for _ in 0..250 {
            automaton.step();
        }
        assert_eq!(automaton.history().len(), HISTORY_CAPACITY);
        assert_eq!(automaton.history().back().unwrap().as_slice(), automaton.current());
        assert_eq!(automaton.generation(), 250);
        assert!(automaton.check_invariants().is_ok());
        automaton.reset();
        assert_eq!(automaton.history().len(), 1);
        assert_eq!(automaton.generation(), 0);
    }
}
