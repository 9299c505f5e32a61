//! Bake stage scheduling
//!
//! The bake stages form a small dependency graph over the textures they
//! read and write: the projection writes the environment cubemap, and
//! both convolution stages read it. The scheduler derives a sequential
//! order with Kahn's algorithm instead of relying on call order, so a
//! stage can never sample a cubemap that has not been written yet.

use thiserror::Error;

/// Textures flowing between bake stages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BakeResource {
    EquirectSource,
    Environment,
    Irradiance,
    Prefiltered,
}

/// One offscreen bake pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BakeStage {
    EquirectProjection,
    IrradianceConvolution,
    SpecularPrefilter,
}

impl BakeStage {
    pub fn inputs(self) -> &'static [BakeResource] {
        match self {
            BakeStage::EquirectProjection => &[BakeResource::EquirectSource],
            BakeStage::IrradianceConvolution => &[BakeResource::Environment],
            BakeStage::SpecularPrefilter => &[BakeResource::Environment],
        }
    }

    pub fn outputs(self) -> &'static [BakeResource] {
        match self {
            BakeStage::EquirectProjection => &[BakeResource::Environment],
            BakeStage::IrradianceConvolution => &[BakeResource::Irradiance],
            BakeStage::SpecularPrefilter => &[BakeResource::Prefiltered],
        }
    }
}

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Bake graph contains a dependency cycle")]
    Cycle,
}

/// The per-environment bake graph
pub struct BakeGraph {
    stages: Vec<BakeStage>,
}

impl Default for BakeGraph {
    fn default() -> Self {
        Self {
            stages: vec![
                BakeStage::IrradianceConvolution,
                BakeStage::SpecularPrefilter,
                BakeStage::EquirectProjection,
            ],
        }
    }
}

impl BakeGraph {
    /// Topologically order the stages so every input is produced before
    /// the stage that consumes it
    pub fn ordered(&self) -> Result<Vec<BakeStage>, GraphError> {
        let n = self.stages.len();

        // edge a -> b when some output of a is an input of b
        let mut in_degree = vec![0usize; n];
        let mut edges: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (a, producer) in self.stages.iter().enumerate() {
            for (b, consumer) in self.stages.iter().enumerate() {
                if a == b {
                    continue;
                }
                if producer
                    .outputs()
                    .iter()
                    .any(|out| consumer.inputs().contains(out))
                {
                    edges[a].push(b);
                    in_degree[b] += 1;
                }
            }
        }

        let mut ready: Vec<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
        let mut order = Vec::with_capacity(n);
        while let Some(i) = ready.pop() {
            order.push(self.stages[i]);
            for &next in &edges[i] {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    ready.push(next);
                }
            }
        }

        if order.len() != n {
            return Err(GraphError::Cycle);
        }
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_runs_before_both_convolutions() {
        let order = BakeGraph::default().ordered().unwrap();
        let pos = |s: BakeStage| order.iter().position(|&x| x == s).unwrap();
        assert!(pos(BakeStage::EquirectProjection) < pos(BakeStage::IrradianceConvolution));
        assert!(pos(BakeStage::EquirectProjection) < pos(BakeStage::SpecularPrefilter));
        assert_eq!(order.len(), 3);
    }

    #[test]
    fn convolutions_consume_what_projection_produces() {
        let produced = BakeStage::EquirectProjection.outputs();
        assert!(BakeStage::IrradianceConvolution
            .inputs()
            .iter()
            .all(|i| produced.contains(i)));
        assert!(BakeStage::SpecularPrefilter
            .inputs()
            .iter()
            .all(|i| produced.contains(i)));
    }

    #[test]
    fn independent_stages_all_get_scheduled() {
        let graph = BakeGraph {
            stages: vec![
                BakeStage::IrradianceConvolution,
                BakeStage::SpecularPrefilter,
            ],
        };
        assert_eq!(graph.ordered().unwrap().len(), 2);
    }
}
