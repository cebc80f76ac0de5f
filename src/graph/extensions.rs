use crate::graph::{amplify::Amplify, mix::Mix, node::GraphNode, through::Through};

pub trait NodeExt: GraphNode + Sized {
    /// Multiply by `modulator` (usually an envelope).
    fn amplify<M: GraphNode>(self, modulator: M) -> Amplify<Self, M> {
        Amplify::new(self, modulator)
    }

    /// Feed this node into `filter`.
    fn through<F: GraphNode>(self, filter: F) -> Through<Self, F> {
        Through::new(self, filter)
    }

    /// Add `source` on top of this node at `gain`; this node keeps unity gain.
    fn layer<M: GraphNode>(self, source: M, gain: f32) -> Mix<Self, M> {
        Mix::new(self, source, 1.0, gain)
    }
}

impl<T: GraphNode> NodeExt for T {}
