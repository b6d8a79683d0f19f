/// A layout engine that computes geometry for a graph
///
/// This trait is generic over the graph type `G`, allowing different layout
/// engines to accept different graph representations and produce their own
/// output type.
pub trait LayoutEngine<G> {
    /// The computed geometry
    type Output;

    /// The error returned when the graph cannot be laid out
    type Error;

    /// Compute the layout of the given graph
    ///
    /// # Errors
    /// Returns an error if the graph violates the engine's constraints
    /// (e.g., it contains cycles, or links reference missing nodes)
    fn layout(&self, graph: G) -> Result<Self::Output, Self::Error>;
}
