//! Operations the parent page serves to its webview.

bridge_rpc::contract! {
    /// The parent page's operation table.
    pub contract DemoContract {
        /// Current contents of the parent's text box.
        GetText = "getText": () => String;
        /// `4 * n`.
        MultiplyByFour = "multiplyByFour": (i64,) => i64;
        /// Always fails with "Intentionally thrown error".
        InduceError = "induceError": () => ();
    }
}

/// Error reported by [`InduceError`].
pub const INDUCED_ERROR: &str = "Intentionally thrown error";
