//! Drill-down navigation between list and detail views

use super::types::{EntityId, LibraryTab, ResourceKind};

/// One entry of the navigation stack
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigationFrame {
    List,
    AlbumDetail {
        album_id: EntityId,
        /// Set when the album was opened from inside an artist's view
        parent_artist_id: Option<EntityId>,
    },
    ArtistDetail {
        artist_id: EntityId,
    },
}

impl NavigationFrame {
    pub fn detail_kind(&self) -> Option<ResourceKind> {
        match self {
            NavigationFrame::List => None,
            NavigationFrame::AlbumDetail { .. } => Some(ResourceKind::Album),
            NavigationFrame::ArtistDetail { .. } => Some(ResourceKind::Artist),
        }
    }
}

/// Ordered stack of frames. The bottom frame is always `List`, and at most one
/// frame of each detail kind is open at a time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationStack {
    tab: LibraryTab,
    frames: Vec<NavigationFrame>,
}

impl Default for NavigationStack {
    fn default() -> Self {
        Self::new(LibraryTab::default())
    }
}

impl NavigationStack {
    pub fn new(tab: LibraryTab) -> Self {
        Self {
            tab,
            frames: vec![NavigationFrame::List],
        }
    }

    pub fn tab(&self) -> LibraryTab {
        self.tab
    }

    pub fn current_frame(&self) -> NavigationFrame {
        self.frames.last().copied().unwrap_or(NavigationFrame::List)
    }

    pub fn frames(&self) -> &[NavigationFrame] {
        &self.frames
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_at_list(&self) -> bool {
        self.current_frame() == NavigationFrame::List
    }

    /// Push a frame. An already open frame of the same detail kind is replaced
    /// together with everything stacked above it.
    pub fn push(&mut self, frame: NavigationFrame) {
        let Some(kind) = frame.detail_kind() else {
            self.frames.truncate(1);
            return;
        };
        if let Some(pos) = self
            .frames
            .iter()
            .position(|f| f.detail_kind() == Some(kind))
        {
            self.frames.truncate(pos.max(1));
        }
        self.frames.push(frame);
    }

    pub fn select_album(&mut self, album_id: EntityId) -> NavigationFrame {
        let parent_artist_id = self.frames.iter().rev().find_map(|f| match f {
            NavigationFrame::ArtistDetail { artist_id } => Some(*artist_id),
            _ => None,
        });
        // The parent only counts if the artist frame survives the replacement
        // of any album frame already open.
        let parent_artist_id = parent_artist_id.filter(|artist| {
            let artist_pos = self
                .frames
                .iter()
                .position(|f| *f == NavigationFrame::ArtistDetail { artist_id: *artist });
            let album_pos = self
                .frames
                .iter()
                .position(|f| matches!(f, NavigationFrame::AlbumDetail { .. }));
            match (artist_pos, album_pos) {
                (Some(a), Some(b)) => a < b,
                _ => true,
            }
        });
        let frame = NavigationFrame::AlbumDetail { album_id, parent_artist_id };
        self.push(frame);
        tracing::debug!(album_id, ?parent_artist_id, depth = self.depth(), "Opened album");
        frame
    }

    pub fn select_artist(&mut self, artist_id: EntityId) -> NavigationFrame {
        let frame = NavigationFrame::ArtistDetail { artist_id };
        self.push(frame);
        tracing::debug!(artist_id, depth = self.depth(), "Opened artist");
        frame
    }

    /// Pop the top frame. Returns false when already at the list.
    pub fn back(&mut self) -> bool {
        if self.frames.len() > 1 {
            self.frames.pop();
            true
        } else {
            false
        }
    }

    /// Switch the top-level tab. Any drill-down state is dropped when the tab
    /// actually changes.
    pub fn switch_tab(&mut self, tab: LibraryTab) -> bool {
        if tab == self.tab {
            return false;
        }
        self.tab = tab;
        self.reset();
        true
    }

    /// Drop every detail frame
    pub fn reset(&mut self) {
        self.frames.truncate(1);
    }
}
