/// App-level view state: one variant per dashboard tab.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppView {
    Containers,
    Images,
    Networks,
    Volumes,
    Metrics,
}

impl AppView {
    pub const ALL: [AppView; 5] = [
        AppView::Containers,
        AppView::Images,
        AppView::Networks,
        AppView::Volumes,
        AppView::Metrics,
    ];

    pub fn title(self) -> &'static str {
        match self {
            AppView::Containers => "Containers",
            AppView::Images => "Images",
            AppView::Networks => "Networks",
            AppView::Volumes => "Volumes",
            AppView::Metrics => "Metrics",
        }
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|v| *v == self).unwrap_or(0)
    }

    pub fn next(self) -> AppView {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> AppView {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// What the keyboard is currently typing into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    NetworkName(String),
    ComposePath(String),
}

impl InputMode {
    pub fn is_editing(&self) -> bool {
        !matches!(self, InputMode::Normal)
    }

    pub fn prompt(&self) -> Option<(&'static str, &str)> {
        match self {
            InputMode::Normal => None,
            InputMode::NetworkName(buf) => Some(("New network name", buf)),
            InputMode::ComposePath(buf) => Some(("Compose directory", buf)),
        }
    }

    pub fn buffer_mut(&mut self) -> Option<&mut String> {
        match self {
            InputMode::Normal => None,
            InputMode::NetworkName(buf) | InputMode::ComposePath(buf) => Some(buf),
        }
    }
}
