//! Octree spatial index over the scene's triangle soup.
//!
//! The tree is built once per render and read-only afterwards, shared by all
//! worker threads. Nodes live in a flat arena (`Vec<OctreeNode>`) addressed by
//! index; the parent link is a plain arena index used only for upward walks,
//! so ownership stays strictly top-down.
//!
//! Triangles are assigned during construction at the lowest node whose cube
//! fully contains their bounding box (the lowest common ancestor of the
//! leaves holding the box's 8 corners). A node's triangle list therefore
//! applies to every descendant, and lookups collect lists along the whole
//! descent path.

use glint_core::Triangle;
use glint_math::{Aabb, Vec3};

/// Fixed subdivision depth of the tree.
pub const MAX_DEPTH: u32 = 5;

/// Root half-width used when the scene has no finite bounds.
const FALLBACK_RADIAL: f32 = 10.0;

/// Margin applied to the scene extent so boundary geometry stays interior.
const ROOT_MARGIN: f32 = 1.1;

/// Sentinel returned by [`Octree::entry_distance`] when the ray misses the
/// node's cube or the cube lies entirely behind the origin.
pub const NO_ENTRY: f32 = -1.0;

/// Arena index of a node.
pub type NodeId = usize;

#[derive(Debug)]
struct OctreeNode {
    /// Cube center; its coordinates are the three axis-aligned split planes.
    center: Vec3,
    /// Half the cube's side length.
    radial: f32,
    depth: u32,
    /// Non-owning back-reference for ancestor walks; `None` only at the root.
    parent: Option<NodeId>,
    /// Child octants, `None` at leaves. Octant code: bit 2 = x, bit 1 = y,
    /// bit 0 = z, set when the point is on the max side of the split plane.
    children: Option<[NodeId; 8]>,
    /// Indices into the scene's triangle soup assigned to this node.
    triangles: Vec<usize>,
}

/// Result of a point lookup: the reached leaf and the descent path.
///
/// `path` holds only the nodes with non-empty triangle lists, topmost first.
/// When the lookup was seeded with a previous leaf, nodes above the common
/// ancestor are omitted (the caller already visited them).
#[derive(Debug)]
pub struct OctreeLookup {
    pub leaf: NodeId,
    pub path: Vec<NodeId>,
}

/// Spatial partition of the triangle soup into a recursively subdivided cube.
pub struct Octree {
    nodes: Vec<OctreeNode>,
}

impl Octree {
    /// Build the tree over a triangle soup.
    ///
    /// The root cube is derived from the union of the scene bounds with a
    /// margin; an empty or degenerate scene falls back to a fixed cube. The
    /// tree is fully expanded to [`MAX_DEPTH`] before insertion.
    pub fn build(triangles: &[Triangle], bounds: &Aabb) -> Self {
        let extent = bounds.max_extent();
        let (center, radial) = if extent.is_finite() && extent > 0.0 {
            (bounds.centroid(), extent * 0.5 * ROOT_MARGIN)
        } else {
            (Vec3::ZERO, FALLBACK_RADIAL)
        };

        let mut tree = Self {
            nodes: vec![OctreeNode {
                center,
                radial,
                depth: 0,
                parent: None,
                children: None,
                triangles: Vec::new(),
            }],
        };
        tree.expand(0);

        for (i, tri) in triangles.iter().enumerate() {
            let corners = tri.bounds().corners();
            let mut anchor = tree.leaf_containing(corners[0]);
            for corner in &corners[1..] {
                let leaf = tree.leaf_containing(*corner);
                anchor = tree
                    .lowest_common_ancestor(Some(anchor), Some(leaf))
                    .unwrap_or(0);
            }
            tree.nodes[anchor].triangles.push(i);
        }

        let populated = tree.nodes.iter().filter(|n| !n.triangles.is_empty()).count();
        log::debug!(
            "octree: {} nodes, {} populated, root radial {radial}",
            tree.nodes.len(),
            populated
        );

        tree
    }

    /// Recursively create all 8 children down to [`MAX_DEPTH`].
    fn expand(&mut self, node: NodeId) {
        let (center, radial, depth) = {
            let n = &self.nodes[node];
            (n.center, n.radial, n.depth)
        };
        if depth >= MAX_DEPTH {
            return;
        }

        let child_radial = radial / 2.0;
        let mut children = [0; 8];
        for (code, child) in children.iter_mut().enumerate() {
            let offset = Vec3::new(
                if code & 0b100 != 0 { child_radial } else { -child_radial },
                if code & 0b010 != 0 { child_radial } else { -child_radial },
                if code & 0b001 != 0 { child_radial } else { -child_radial },
            );
            *child = self.nodes.len();
            self.nodes.push(OctreeNode {
                center: center + offset,
                radial: child_radial,
                depth: depth + 1,
                parent: Some(node),
                children: None,
                triangles: Vec::new(),
            });
        }
        self.nodes[node].children = Some(children);

        for child in children {
            self.expand(child);
        }
    }

    /// Child octant containing `point`, or `None` on a leaf.
    pub fn get_child(&self, node: NodeId, point: Vec3) -> Option<NodeId> {
        let n = &self.nodes[node];
        let children = n.children?;
        let mut code = 0;
        code |= usize::from(point.x >= n.center.x) << 2;
        code |= usize::from(point.y >= n.center.y) << 1;
        code |= usize::from(point.z >= n.center.z);
        Some(children[code])
    }

    /// Descend from the root to the leaf whose octant chain contains `point`.
    ///
    /// Points outside the root bound still descend (each split plane sends
    /// them to the nearest octant); use [`Octree::contains`] to test bounds.
    pub fn leaf_containing(&self, point: Vec3) -> NodeId {
        let mut node = 0;
        while let Some(child) = self.get_child(node, point) {
            node = child;
        }
        node
    }

    /// Lowest common ancestor of two nodes.
    ///
    /// A `None` operand returns the other unchanged, which lets callers fold
    /// an ancestor across a point set pairwise.
    pub fn lowest_common_ancestor(
        &self,
        a: Option<NodeId>,
        b: Option<NodeId>,
    ) -> Option<NodeId> {
        let (mut a, mut b) = match (a, b) {
            (None, b) => return b,
            (a, None) => return a,
            (Some(a), Some(b)) => (a, b),
        };
        while a != b {
            // The climbed side is never the root while a != b
            if self.nodes[a].depth > self.nodes[b].depth {
                a = self.nodes[a].parent.unwrap_or(0);
            } else {
                b = self.nodes[b].parent.unwrap_or(0);
            }
        }
        Some(a)
    }

    /// True when `point` lies within the root cube (inclusive).
    pub fn contains(&self, point: Vec3) -> bool {
        let root = &self.nodes[0];
        let d = (point - root.center).abs();
        d.x <= root.radial && d.y <= root.radial && d.z <= root.radial
    }

    /// Slab-method ray/cube intersection against a node's cube.
    ///
    /// Returns the midpoint of the surviving parametric overlap clamped to be
    /// non-negative (a point safely inside the cube for rays starting outside
    /// or within it), or [`NO_ENTRY`] when the ray misses the cube or the
    /// cube lies entirely behind the origin.
    pub fn entry_distance(&self, node: NodeId, origin: Vec3, dir: Vec3) -> f32 {
        let n = &self.nodes[node];
        let min = n.center - Vec3::splat(n.radial);
        let max = n.center + Vec3::splat(n.radial);

        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;
        for axis in 0..3 {
            let inv = 1.0 / dir[axis];
            let mut t0 = (min[axis] - origin[axis]) * inv;
            let mut t1 = (max[axis] - origin[axis]) * inv;
            if inv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_max < t_min {
                return NO_ENTRY;
            }
        }
        if t_max < 0.0 {
            return NO_ENTRY;
        }
        ((t_min + t_max) * 0.5).max(0.0)
    }

    /// Look up the leaf containing `point`, collecting every node with a
    /// non-empty triangle list along the descent path.
    ///
    /// With a `previous` leaf the descent restarts from the lowest ancestor
    /// of `previous` whose cube contains `point` instead of the root, so a
    /// ray march does not re-collect lists it has already visited. Returns
    /// `None` when `point` falls outside the root bound.
    pub fn get_new_triangles(
        &self,
        point: Vec3,
        previous: Option<NodeId>,
    ) -> Option<OctreeLookup> {
        if !self.contains(point) {
            return None;
        }

        let mut node = match previous {
            Some(prev) => {
                let mut node = prev;
                while !self.node_contains(node, point) {
                    match self.nodes[node].parent {
                        Some(parent) => node = parent,
                        None => break,
                    }
                }
                node
            }
            None => 0,
        };

        let mut path = Vec::new();
        loop {
            if !self.nodes[node].triangles.is_empty() {
                path.push(node);
            }
            match self.get_child(node, point) {
                Some(child) => node = child,
                None => break,
            }
        }

        Some(OctreeLookup { leaf: node, path })
    }

    /// Triangle indices stored at `node`.
    pub fn node_triangles(&self, node: NodeId) -> &[usize] {
        &self.nodes[node].triangles
    }

    /// Side length of a node's cube, the march step of the traversal loop.
    pub fn leaf_diameter(&self, node: NodeId) -> f32 {
        self.nodes[node].radial * 2.0
    }

    pub fn node_depth(&self, node: NodeId) -> u32 {
        self.nodes[node].depth
    }

    pub fn is_leaf(&self, node: NodeId) -> bool {
        self.nodes[node].children.is_none()
    }

    fn node_contains(&self, node: NodeId, point: Vec3) -> bool {
        let n = &self.nodes[node];
        let d = (point - n.center).abs();
        d.x <= n.radial && d.y <= n.radial && d.z <= n.radial
    }

    /// True when `a` is `b` or an ancestor of `b`.
    #[cfg(test)]
    fn is_ancestor_or_self(&self, a: NodeId, b: NodeId) -> bool {
        let mut node = b;
        loop {
            if node == a {
                return true;
            }
            match self.nodes[node].parent {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_tree() -> Octree {
        Octree::build(&[], &Aabb::EMPTY)
    }

    fn single_triangle() -> (Vec<Triangle>, Octree) {
        let triangles = vec![Triangle::new(
            Vec3::new(-1.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, -1.0),
            Vec3::new(0.0, 0.0, 1.0),
            1.0,
            1.5,
        )];
        let bounds = Aabb::from_points(Vec3::splat(-4.0), Vec3::splat(4.0));
        let octree = Octree::build(&triangles, &bounds);
        (triangles, octree)
    }

    #[test]
    fn test_full_expansion() {
        let tree = empty_tree();
        // Fully expanded tree: sum of 8^d for d in 0..=MAX_DEPTH
        let expected: usize = (0..=MAX_DEPTH).map(|d| 8usize.pow(d)).sum();
        assert_eq!(tree.nodes.len(), expected);

        let leaf = tree.leaf_containing(Vec3::ZERO);
        assert!(tree.is_leaf(leaf));
        assert_eq!(tree.node_depth(leaf), MAX_DEPTH);
    }

    #[test]
    fn test_get_child_octant_codes() {
        let tree = empty_tree();
        // Max-side point and min-side point land in different octants
        let hi = tree.get_child(0, Vec3::splat(1.0)).unwrap();
        let lo = tree.get_child(0, Vec3::splat(-1.0)).unwrap();
        assert_ne!(hi, lo);

        // A leaf has no children
        let leaf = tree.leaf_containing(Vec3::ZERO);
        assert_eq!(tree.get_child(leaf, Vec3::ZERO), None);
    }

    #[test]
    fn test_lca_properties() {
        let tree = empty_tree();
        let a = tree.leaf_containing(Vec3::new(5.0, 5.0, 5.0));
        let b = tree.leaf_containing(Vec3::new(-5.0, -5.0, -5.0));

        // Identity and None folding
        assert_eq!(tree.lowest_common_ancestor(Some(a), Some(a)), Some(a));
        assert_eq!(tree.lowest_common_ancestor(None, Some(b)), Some(b));
        assert_eq!(tree.lowest_common_ancestor(Some(a), None), Some(a));
        assert_eq!(tree.lowest_common_ancestor(None, None), None);

        // Ancestor of both; opposite corners only share the root
        let lca = tree.lowest_common_ancestor(Some(a), Some(b)).unwrap();
        assert!(tree.is_ancestor_or_self(lca, a));
        assert!(tree.is_ancestor_or_self(lca, b));
        assert_eq!(lca, 0);

        // Nearby points share a deeper ancestor
        let c = tree.leaf_containing(Vec3::new(5.0, 5.0, 5.0));
        let d = tree.leaf_containing(Vec3::new(5.1, 5.0, 5.0));
        let deep = tree.lowest_common_ancestor(Some(c), Some(d)).unwrap();
        assert!(tree.node_depth(deep) >= 1);
        assert!(tree.is_ancestor_or_self(deep, c));
        assert!(tree.is_ancestor_or_self(deep, d));
    }

    #[test]
    fn test_triangle_coverage() {
        // The triangle must be reachable from the descent path of every
        // point inside its bounding box.
        let (triangles, tree) = single_triangle();
        let bounds = triangles[0].bounds();

        let mut probes = bounds.corners().to_vec();
        probes.push(bounds.centroid());

        for probe in probes {
            let lookup = tree.get_new_triangles(probe, None).expect("probe in root");
            let found = lookup
                .path
                .iter()
                .any(|&node| tree.node_triangles(node).contains(&0));
            assert!(found, "triangle lost at probe {probe:?}");
        }
    }

    #[test]
    fn test_lookup_outside_root_is_invalid() {
        let tree = empty_tree();
        assert!(tree.get_new_triangles(Vec3::splat(100.0), None).is_none());
        assert!(tree.get_new_triangles(Vec3::ZERO, None).is_some());
    }

    #[test]
    fn test_lookup_with_previous_leaf_hint() {
        let (_, tree) = single_triangle();
        let first = tree.get_new_triangles(Vec3::new(0.0, 0.0, 0.0), None).unwrap();
        let step = tree.leaf_diameter(first.leaf);

        // Re-query one leaf over with the hint; same leaf as a fresh query
        let point = Vec3::new(step, 0.0, 0.0);
        let hinted = tree.get_new_triangles(point, Some(first.leaf)).unwrap();
        let fresh = tree.get_new_triangles(point, None).unwrap();
        assert_eq!(hinted.leaf, fresh.leaf);
    }

    #[test]
    fn test_entry_distance_slab() {
        let tree = empty_tree(); // root cube [-10, 10]^3

        // Ray from outside toward the cube: overlap [5, 25], midpoint 15
        let t = tree.entry_distance(0, Vec3::new(0.0, 0.0, -15.0), Vec3::Z);
        assert!(t > 0.0);
        let entry = Vec3::new(0.0, 0.0, -15.0) + Vec3::Z * t;
        assert!(tree.contains(entry));

        // Ray pointing away: cube entirely behind the origin
        let away = tree.entry_distance(0, Vec3::new(0.0, 0.0, -15.0), -Vec3::Z);
        assert!(away < 0.0);

        // Ray missing the cube sideways
        let miss = tree.entry_distance(0, Vec3::new(0.0, 50.0, -15.0), Vec3::Z);
        assert!(miss < 0.0);

        // Origin inside: midpoint clamped non-negative
        let inside = tree.entry_distance(0, Vec3::ZERO, Vec3::Z);
        assert!(inside >= 0.0);
    }

    #[test]
    fn test_negative_direction_slabs() {
        let tree = empty_tree();
        let t = tree.entry_distance(0, Vec3::new(0.0, 0.0, 15.0), -Vec3::Z);
        assert!(t > 0.0);
        assert!(tree.contains(Vec3::new(0.0, 0.0, 15.0) - Vec3::Z * t));
    }
}
