use slotmap::new_key_type;

new_key_type! {
    /// Identifies a rendered bubble element. Stable for as long as the
    /// bubble's country stays in the rendered set.
    pub struct BubbleId;
}
