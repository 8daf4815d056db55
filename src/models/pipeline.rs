// src/models/pipeline.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MoveStatusPayload {
    #[schema(example = "right")]
    pub direction: Direction,
}

/// Um funil linear de status: a posição na tabela `STAGES` é tudo o que importa.
///
/// Não há guardas de transição. Mover só troca pelo vizinho da tabela e,
/// fora dos limites, devolve o próprio status.
pub trait PipelineStage: Copy + PartialEq + 'static {
    const STAGES: &'static [Self];

    fn position(self) -> Option<usize> {
        Self::STAGES.iter().position(|stage| *stage == self)
    }

    fn first() -> Self {
        Self::STAGES[0]
    }

    fn step(self, direction: Direction) -> Self {
        let Some(idx) = self.position() else {
            return self;
        };

        let next = match direction {
            Direction::Left => idx.checked_sub(1),
            Direction::Right => Some(idx + 1),
        };

        next.and_then(|i| Self::STAGES.get(i).copied())
            .unwrap_or(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{leads::LeadStatus, sales::SaleStatus};

    fn edges_are_no_ops<S: PipelineStage + std::fmt::Debug>() {
        let first = S::STAGES[0];
        let last = S::STAGES[S::STAGES.len() - 1];
        assert_eq!(first.step(Direction::Left), first);
        assert_eq!(last.step(Direction::Right), last);
    }

    fn right_then_left_round_trips<S: PipelineStage + std::fmt::Debug>() {
        for stage in &S::STAGES[1..S::STAGES.len() - 1] {
            assert_eq!(stage.step(Direction::Right).step(Direction::Left), *stage);
            assert_eq!(stage.step(Direction::Left).step(Direction::Right), *stage);
        }
    }

    #[test]
    fn sale_pipeline_edges() {
        edges_are_no_ops::<SaleStatus>();
        right_then_left_round_trips::<SaleStatus>();
    }

    #[test]
    fn lead_pipeline_edges() {
        edges_are_no_ops::<LeadStatus>();
        right_then_left_round_trips::<LeadStatus>();
    }

    #[test]
    fn every_stage_is_reachable_by_single_steps() {
        let mut status = SaleStatus::first();
        let mut seen = vec![status];
        while status != SaleStatus::PaymentDone {
            status = status.step(Direction::Right);
            seen.push(status);
        }
        assert_eq!(seen, SaleStatus::STAGES);
    }

    #[test]
    fn direction_parses_from_lowercase() {
        let payload: MoveStatusPayload = serde_json::from_str(r#"{"direction":"left"}"#).unwrap();
        assert_eq!(payload.direction, Direction::Left);
    }
}
