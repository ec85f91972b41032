pub struct Icons;

impl Icons {
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const WARN: &str = "⚠️";
    pub const INFO: &str = "ℹ️";
    pub const STATS: &str = "📊";
    pub const NOTE: &str = "📝";
    pub const CLOCK: &str = "⏱️";
    pub const EMPTY: &str = "∅";
}
