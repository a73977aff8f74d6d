//! Sector membership nodes. A thing can stand in several sectors at once, and
//! each sector can hold many things, so every membership is a node threaded on
//! two lists: the thing's list of sectors (`t_prev`/`t_next`) and the sector's
//! list of things (`s_prev`/`s_next`).
//!
//! Nodes live in an arena and are recycled through a free stack, so the
//! `NodeId` handles stay valid until the node is deleted.

#[cfg(feature = "null_check")]
use log::error;

use crate::thing::ThingId;

use super::map_defs::Sector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
pub struct SecNode {
    pub sector: usize,
    /// `None` marks a node as stale during a membership rebuild
    pub thing: Option<ThingId>,
    pub t_prev: Option<NodeId>,
    pub t_next: Option<NodeId>,
    pub s_prev: Option<NodeId>,
    pub s_next: Option<NodeId>,
    /// Used by sector height changes to process each thing once
    pub visited: bool,
}

impl SecNode {
    const fn blank() -> Self {
        Self {
            sector: 0,
            thing: None,
            t_prev: None,
            t_next: None,
            s_prev: None,
            s_next: None,
            visited: false,
        }
    }
}

#[derive(Debug, Default)]
pub struct SecNodes {
    nodes: Vec<SecNode>,
    free: Vec<NodeId>,
}

impl SecNodes {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &SecNode {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut SecNode {
        &mut self.nodes[id.index()]
    }

    /// Number of nodes ever allocated, live or free
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    /// Number of nodes waiting for reuse
    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    /// Take a node from the free stack, or allocate one. The caller must set
    /// every field.
    ///
    /// Doom function name `P_GetSecnode`
    pub fn get_node(&mut self) -> NodeId {
        if let Some(id) = self.free.pop() {
            return id;
        }
        self.nodes.push(SecNode::blank());
        NodeId((self.nodes.len() - 1) as u32)
    }

    /// Doom function name `P_PutSecnode`
    pub fn put_node(&mut self, id: NodeId) {
        #[cfg(feature = "null_check")]
        if self.free.contains(&id) {
            error!("Secnode {id:?} returned to the free stack twice");
        }
        self.nodes[id.index()] = SecNode::blank();
        self.free.push(id);
    }

    /// Make sure `thing` has a node for `sector` in the thing chain starting at
    /// `head`. An existing node is marked as kept, otherwise a new node is
    /// pushed on the front of both chains. Returns the new head of the thing
    /// chain.
    ///
    /// Doom function name `P_AddSecnode`
    pub fn add_secnode(
        &mut self,
        sectors: &mut [Sector],
        sector: usize,
        thing: ThingId,
        head: Option<NodeId>,
    ) -> NodeId {
        let mut node = head;
        while let Some(id) = node {
            let n = &mut self.nodes[id.index()];
            if n.sector == sector {
                n.thing = Some(thing);
                return head.unwrap_or(id);
            }
            node = n.t_next;
        }

        let id = self.get_node();
        let s_next = sectors[sector].touching_thinglist;
        {
            let n = &mut self.nodes[id.index()];
            n.sector = sector;
            n.thing = Some(thing);
            n.t_prev = None;
            n.t_next = head;
            n.s_prev = None;
            n.s_next = s_next;
            // A reclip in progress must not pick up things that join late
            n.visited = true;
        }
        if let Some(h) = head {
            self.nodes[h.index()].t_prev = Some(id);
        }
        if let Some(s) = s_next {
            self.nodes[s.index()].s_prev = Some(id);
        }
        sectors[sector].touching_thinglist = Some(id);
        id
    }

    /// Unlink a node from both chains and free it. Returns the next node on
    /// the thing chain.
    ///
    /// Doom function name `P_DelSecnode`
    pub fn del_secnode(&mut self, sectors: &mut [Sector], id: NodeId) -> Option<NodeId> {
        let SecNode {
            sector,
            t_prev,
            t_next,
            s_prev,
            s_next,
            ..
        } = self.nodes[id.index()].clone();

        if let Some(tp) = t_prev {
            self.nodes[tp.index()].t_next = t_next;
        }
        if let Some(tn) = t_next {
            self.nodes[tn.index()].t_prev = t_prev;
        }

        match s_prev {
            Some(sp) => self.nodes[sp.index()].s_next = s_next,
            None => sectors[sector].touching_thinglist = s_next,
        }
        if let Some(sn) = s_next {
            self.nodes[sn.index()].s_prev = s_prev;
        }

        self.put_node(id);
        t_next
    }

    /// Delete an entire thing chain
    ///
    /// Doom function name `P_DelSeclist`
    pub fn del_seclist(&mut self, sectors: &mut [Sector], head: Option<NodeId>) {
        let mut node = head;
        while let Some(id) = node {
            node = self.del_secnode(sectors, id);
        }
    }

    /// Drop every node and the free stack. Sector heads must be reset by the
    /// caller.
    ///
    /// Doom function name `P_FreeSecNodeList`
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
    }

    /// Walk a thing's chain of sector nodes
    pub fn thing_chain(&self, head: Option<NodeId>) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(head, move |id| self.nodes[id.index()].t_next)
    }

    /// Walk a sector's chain of thing nodes
    pub fn sector_chain(&self, head: Option<NodeId>) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(head, move |id| self.nodes[id.index()].s_next)
    }
}

#[cfg(test)]
mod tests {
    use super::SecNodes;
    use crate::level::map_defs::Sector;
    use crate::thing::ThingId;

    fn sectors(n: usize) -> Vec<Sector> {
        (0..n)
            .map(|i| Sector::new(i as u32, 0.0, 128.0, 0, 0, 160, 0, 0))
            .collect()
    }

    #[test]
    fn add_is_idempotent_per_sector() {
        let mut secs = sectors(3);
        let mut nodes = SecNodes::new();
        let t = ThingId::new(0, 0);

        let mut head = None;
        head = Some(nodes.add_secnode(&mut secs, 1, t, head));
        head = Some(nodes.add_secnode(&mut secs, 2, t, head));
        let again = nodes.add_secnode(&mut secs, 1, t, head);
        assert_eq!(Some(again), head);
        assert_eq!(nodes.thing_chain(head).count(), 2);
        assert_eq!(nodes.sector_chain(secs[1].touching_thinglist).count(), 1);
        assert!(secs[0].touching_thinglist.is_none());
    }

    #[test]
    fn delete_unlinks_both_chains_and_reuses() {
        let mut secs = sectors(1);
        let mut nodes = SecNodes::new();
        let a = ThingId::new(0, 0);
        let b = ThingId::new(1, 0);
        let c = ThingId::new(2, 0);

        let na = nodes.add_secnode(&mut secs, 0, a, None);
        let nb = nodes.add_secnode(&mut secs, 0, b, None);
        let nc = nodes.add_secnode(&mut secs, 0, c, None);
        // Sector chain is newest first
        let chain: Vec<_> = nodes.sector_chain(secs[0].touching_thinglist).collect();
        assert_eq!(chain, vec![nc, nb, na]);

        assert_eq!(nodes.del_secnode(&mut secs, nb), None);
        let chain: Vec<_> = nodes.sector_chain(secs[0].touching_thinglist).collect();
        assert_eq!(chain, vec![nc, na]);

        nodes.del_secnode(&mut secs, nc);
        assert_eq!(secs[0].touching_thinglist, Some(na));
        assert_eq!(nodes.free_len(), 2);

        let cap = nodes.capacity();
        nodes.add_secnode(&mut secs, 0, b, None);
        assert_eq!(nodes.capacity(), cap);
        assert_eq!(nodes.free_len(), 1);
    }

    #[test]
    fn del_seclist_empties_sectors() {
        let mut secs = sectors(4);
        let mut nodes = SecNodes::new();
        let t = ThingId::new(0, 0);
        let mut head = None;
        for s in 0..4 {
            head = Some(nodes.add_secnode(&mut secs, s, t, head));
        }
        nodes.del_seclist(&mut secs, head);
        assert!(secs.iter().all(|s| s.touching_thinglist.is_none()));
        assert_eq!(nodes.free_len(), 4);
    }
}
