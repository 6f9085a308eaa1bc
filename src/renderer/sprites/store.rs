use super::SpriteFrag;

/// Frame-scoped fragment arena with one singly linked list per drawable
/// subsector.  Lists are threaded through [`SpriteFrag::next`].
#[derive(Debug, Default)]
pub(crate) struct FragStore {
    frags: Vec<SpriteFrag>,
    heads: Vec<Option<u32>>,
}

impl FragStore {
    pub fn with_capacity(frags: usize) -> Self {
        Self {
            frags: Vec::with_capacity(frags),
            heads: Vec::new(),
        }
    }

    /// Drop last frame's fragments; keeps the allocations.
    pub fn reset(&mut self, draw_subsecs: usize) {
        self.frags.clear();
        self.heads.clear();
        self.heads.resize(draw_subsecs, None);
    }

    /// File `frag` at the head of draw subsector `draw_idx`'s list.
    pub fn push_front(&mut self, draw_idx: u16, mut frag: SpriteFrag) -> u32 {
        let head = &mut self.heads[draw_idx as usize];
        let idx = self.frags.len() as u32;
        frag.next = *head;
        *head = Some(idx);
        self.frags.push(frag);
        idx
    }

    #[inline]
    pub fn get(&self, idx: u32) -> &SpriteFrag {
        &self.frags[idx as usize]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frags.len()
    }

    #[inline]
    pub fn draw_subsec_count(&self) -> usize {
        self.heads.len()
    }

    /// Fragment indices filed under `draw_idx`, newest first.
    pub fn leaf(&self, draw_idx: u16) -> LeafIter<'_> {
        LeafIter {
            store: self,
            cur: self.heads[draw_idx as usize],
        }
    }
}

pub(crate) struct LeafIter<'a> {
    store: &'a FragStore,
    cur: Option<u32>,
}

impl Iterator for LeafIter<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        let idx = self.cur?;
        self.cur = self.store.get(idx).next;
        Some(idx)
    }
}
