use log::warn;
use rand::Rng;
use times_table_core::{
    CellCoord, CellKind, TokenId, TokenSnapshot, TokenValue, TokenView, TOKEN_COUNT,
};

use crate::grid::Grid;

#[derive(Clone, Copy, Debug)]
struct Token {
    id: TokenId,
    cell: Option<CellCoord>,
    value: TokenValue,
}

impl Token {
    fn active_cell(&self, grid: &Grid) -> Option<CellCoord> {
        self.cell
            .filter(|cell| grid.contains(*cell) && grid.get(*cell) == CellKind::Number)
    }
}

/// The six numbered tokens of a round. Index 0 and 1 form the target pair.
#[derive(Clone, Debug)]
pub(crate) struct TokenSet {
    tokens: Vec<Token>,
}

impl TokenSet {
    pub(crate) fn new() -> Self {
        let tokens = (0..TOKEN_COUNT)
            .map(|index| Token {
                id: TokenId::new(index as u32),
                cell: None,
                value: TokenValue::from_clamped(TokenValue::MIN),
            })
            .collect();
        Self { tokens }
    }

    /// Places every token that is not currently on the board onto a random
    /// empty cell. Tokens still on the board keep their cell and value.
    ///
    /// Returns the number of tokens placed.
    pub(crate) fn spawn_all<R>(&mut self, grid: &mut Grid, rng: &mut R) -> usize
    where
        R: Rng + ?Sized,
    {
        let vacant: Vec<usize> = self
            .tokens
            .iter()
            .enumerate()
            .filter(|(_, token)| token.active_cell(grid).is_none())
            .map(|(index, _)| index)
            .collect();

        let size = grid.size().get();
        let mut placed = 0;
        for index in vacant {
            let token = &mut self.tokens[index];
            if grid.count(CellKind::Empty) == 0 {
                warn!("no empty cell left for token {}", token.id.get());
                token.cell = None;
                continue;
            }

            let cell = loop {
                let candidate = CellCoord::new(rng.gen_range(0..size), rng.gen_range(0..size));
                if grid.get(candidate) == CellKind::Empty {
                    break candidate;
                }
            };

            token.value =
                TokenValue::from_clamped(rng.gen_range(TokenValue::MIN..=TokenValue::MAX));
            token.cell = Some(cell);
            grid.set(cell, CellKind::Number);
            placed += 1;
        }
        placed
    }

    /// Product of the target pair's values.
    pub(crate) fn target_product(&self) -> u32 {
        self.tokens
            .iter()
            .take(2)
            .map(|token| u32::from(token.value.get()))
            .product()
    }

    /// Removes the active token on `cell` from play and returns it.
    pub(crate) fn take_at(
        &mut self,
        cell: CellCoord,
        grid: &mut Grid,
    ) -> Option<(TokenId, TokenValue)> {
        let token = self
            .tokens
            .iter_mut()
            .find(|token| token.active_cell(grid) == Some(cell))?;
        token.cell = None;
        grid.set(cell, CellKind::Empty);
        Some((token.id, token.value))
    }

    /// Forgets the token placed on `cell` after the cell was overwritten.
    pub(crate) fn release_at(&mut self, cell: CellCoord) -> Option<TokenId> {
        let token = self
            .tokens
            .iter_mut()
            .find(|token| token.cell == Some(cell))?;
        token.cell = None;
        Some(token.id)
    }

    pub(crate) fn view(&self, grid: &Grid) -> TokenView {
        let snapshots = self
            .tokens
            .iter()
            .filter_map(|token| {
                token.active_cell(grid).map(|cell| TokenSnapshot {
                    id: token.id,
                    cell,
                    value: token.value,
                })
            })
            .collect();
        TokenView::from_snapshots(snapshots)
    }

    /// Replaces the layout with explicit placements, in token order.
    #[cfg(any(test, feature = "round_scaffolding"))]
    pub(crate) fn arrange(&mut self, grid: &mut Grid, placements: &[(CellCoord, TokenValue)]) {
        for token in self.tokens.iter_mut() {
            if let Some(cell) = token.active_cell(grid) {
                grid.set(cell, CellKind::Empty);
            }
            token.cell = None;
        }

        for (token, (cell, value)) in self.tokens.iter_mut().zip(placements) {
            grid.set(*cell, CellKind::Number);
            token.cell = Some(*cell);
            token.value = *value;
        }
    }
}
