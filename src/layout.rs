use std::fmt;

/// Collapsible sections of the Metrics tab.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum SectionId {
    Aggregate,
    CpuHistory,
    MemoryHistory,
    NetBlockIo,
    PerContainer,
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionId::Aggregate => write!(f, "Aggregate"),
            SectionId::CpuHistory => write!(f, "CPU History"),
            SectionId::MemoryHistory => write!(f, "Memory History"),
            SectionId::NetBlockIo => write!(f, "Network & Block I/O"),
            SectionId::PerContainer => write!(f, "Per Container"),
        }
    }
}

pub struct SectionLayout {
    pub id: SectionId,
    pub title: String,
    pub collapsed: bool,
}

impl SectionLayout {
    pub fn new(id: SectionId) -> Self {
        Self {
            title: id.to_string(),
            id,
            collapsed: false,
        }
    }

    pub fn collapsed(mut self) -> Self {
        self.collapsed = true;
        self
    }
}

pub struct Layout {
    pub sections: Vec<SectionLayout>,
}

impl Layout {
    /// Default section ordering for the Metrics tab.
    pub fn default_layout() -> Self {
        Self {
            sections: vec![
                SectionLayout::new(SectionId::Aggregate),
                SectionLayout::new(SectionId::CpuHistory),
                SectionLayout::new(SectionId::MemoryHistory),
                SectionLayout::new(SectionId::NetBlockIo),
                SectionLayout::new(SectionId::PerContainer).collapsed(),
            ],
        }
    }

    pub fn section_at(&self, index: usize) -> Option<SectionId> {
        self.sections.get(index).map(|s| s.id)
    }

    pub fn toggle_section(&mut self, id: SectionId) {
        if let Some(s) = self.sections.iter_mut().find(|s| s.id == id) {
            s.collapsed = !s.collapsed;
        }
    }

    pub fn is_collapsed(&self, id: SectionId) -> bool {
        self.sections.iter().find(|s| s.id == id).map(|s| s.collapsed).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_container_starts_collapsed() {
        let layout = Layout::default_layout();
        assert!(layout.is_collapsed(SectionId::PerContainer));
        assert!(!layout.is_collapsed(SectionId::Aggregate));
    }

    #[test]
    fn toggle_section_round_trip() {
        let mut layout = Layout::default_layout();
        layout.toggle_section(SectionId::CpuHistory);
        assert!(layout.is_collapsed(SectionId::CpuHistory));
        layout.toggle_section(SectionId::CpuHistory);
        assert!(!layout.is_collapsed(SectionId::CpuHistory));
    }

    #[test]
    fn section_at_follows_order() {
        let layout = Layout::default_layout();
        assert_eq!(layout.section_at(0), Some(SectionId::Aggregate));
        assert_eq!(layout.section_at(4), Some(SectionId::PerContainer));
        assert_eq!(layout.section_at(5), None);
    }
}
