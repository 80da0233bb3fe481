//! UI state - presentation state separate from the workflow

/// Tab selection in the main UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Input,
    Generation,
    Results,
}

impl Tab {
    pub fn all() -> Vec<Tab> {
        vec![Tab::Input, Tab::Generation, Tab::Results]
    }

    pub fn name(&self) -> &str {
        match self {
            Tab::Input => "Input",
            Tab::Generation => "AI Generation",
            Tab::Results => "Results",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Input => 0,
            Tab::Generation => 1,
            Tab::Results => 2,
        }
    }
}

/// Main application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Splash,
    Running,
}

/// Backend reachability, from the startup health check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServerHealth {
    #[default]
    Checking,
    Online,
    Offline,
}

impl ServerHealth {
    pub fn label(&self) -> &str {
        match self {
            ServerHealth::Checking => "checking",
            ServerHealth::Online => "online",
            ServerHealth::Offline => "offline",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_order_matches_index() {
        for (i, tab) in Tab::all().iter().enumerate() {
            assert_eq!(tab.index(), i);
        }
    }
}
