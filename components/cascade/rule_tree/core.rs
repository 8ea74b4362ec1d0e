/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

#![allow(unsafe_code)]

//! The core of the rule tree: the node representation, the lock-free child
//! lists, and garbage collection.
//!
//! Every topology mutation is a compare-and-swap on a child link, so style
//! workers can insert concurrently without locking. Nodes hold their
//! declaration block weakly; once the block's owner drops it and no computed
//! style references the node, a GC sweep splices the node out. Unlinked nodes
//! are reclaimed one sweep later, so a traversal racing the sweep never
//! observes freed memory.

use crate::rule_tree::source::WeakStyleSource;
use crate::rule_tree::{CascadeLevel, StyleSource};
use crate::properties::Importance;
use parking_lot::Mutex;
use std::fmt;
use std::io::Write;
use std::marker::PhantomData;
use std::mem::{self, ManuallyDrop};
use std::ptr::{self, NonNull};
use std::sync::atomic::{AtomicBool, AtomicPtr, AtomicUsize, Ordering};

/// The number of rule-node constructions between periodic GC sweeps.
const RULE_TREE_GC_INTERVAL: usize = 300;

/// The rule tree. Stable under concurrent insertion; see the module docs for
/// the reclamation story.
pub struct RuleTree {
    root: ManuallyDrop<StrongRuleNode>,
    gc: Mutex<GcState>,
    constructions: AtomicUsize,
}

#[derive(Default)]
struct GcState {
    /// Nodes unlinked by the previous sweep, still allocated so that racing
    /// traversals can finish walking through them.
    graveyard: Vec<*mut RuleNode>,
}

// The tree only hands out refcounted node handles; the raw pointers in the
// graveyard are reachable from one thread at a time, under the GC lock.
#[allow(unsafe_code)]
unsafe impl Send for RuleTree {}
#[allow(unsafe_code)]
unsafe impl Sync for RuleTree {}

pub(crate) struct RuleNode {
    /// The parent, kept alive for as long as any of its children exists.
    /// `None` for the root.
    parent: Option<StrongRuleNode>,

    /// The declaration block of this node, held weakly so the tree never
    /// keeps dropped stylesheets alive. `None` for the root.
    source: Option<WeakStyleSource>,

    /// The cascade level this node is positioned at.
    level: CascadeLevel,

    /// The number of `StrongRuleNode`s referencing this node. Children count
    /// here too, through their `parent` handle, so a zero refcount implies a
    /// childless node with no external references.
    refcount: AtomicUsize,

    first_child: AtomicPtr<RuleNode>,
    next_sibling: AtomicPtr<RuleNode>,

    /// Raised when the last handle to this node or to one of its descendants
    /// goes away, so the next construction cycle knows a sweep may pay off.
    gc_requested: AtomicBool,
}

impl RuleNode {
    fn new(parent: StrongRuleNode, source: &StyleSource, level: CascadeLevel) -> Self {
        debug_assert!(level >= parent.cascade_level());
        RuleNode {
            parent: Some(parent),
            source: Some(source.downgrade()),
            level,
            refcount: AtomicUsize::new(1),
            first_child: AtomicPtr::new(ptr::null_mut()),
            next_sibling: AtomicPtr::new(ptr::null_mut()),
            gc_requested: AtomicBool::new(false),
        }
    }

    fn root() -> Self {
        RuleNode {
            parent: None,
            source: None,
            level: CascadeLevel::UANormal,
            refcount: AtomicUsize::new(1),
            first_child: AtomicPtr::new(ptr::null_mut()),
            next_sibling: AtomicPtr::new(ptr::null_mut()),
            gc_requested: AtomicBool::new(false),
        }
    }

    fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    fn source_matches(&self, source: &StyleSource) -> bool {
        self.source
            .as_ref()
            .map_or(false, |weak| weak.ptr_eq_source(source))
    }

    /// Flags this node and its ancestor chain for collection. Stops as soon
    /// as an already-flagged ancestor is found, since its own propagation
    /// must have reached the root already.
    fn request_gc(&self) {
        if self.gc_requested.swap(true, Ordering::Release) {
            return;
        }
        let mut current = self.parent.as_ref();
        while let Some(parent) = current {
            let node = parent.get();
            if node.gc_requested.swap(true, Ordering::Release) {
                break;
            }
            current = node.parent.as_ref();
        }
    }

    /// Marks this node's next-sibling link so no further sibling can be
    /// appended behind it, and returns the stable next pointer.
    fn mark_next_sibling(&self) -> *mut RuleNode {
        loop {
            let next = self.next_sibling.load(Ordering::Acquire);
            debug_assert!(!is_marked(next), "node unlinked twice");
            if self
                .next_sibling
                .compare_exchange_weak(next, mark(next), Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return next;
            }
        }
    }
}

/// Link marking, in the style of Harris' lock-free lists: a node about to be
/// spliced out gets the low bit of its next-sibling pointer set, which makes
/// any concurrent tail-append CAS fail and retry from the parent.
fn is_marked(ptr: *mut RuleNode) -> bool {
    ptr as usize & 1 != 0
}

fn mark(ptr: *mut RuleNode) -> *mut RuleNode {
    (ptr as usize | 1) as *mut RuleNode
}

fn strip_mark(ptr: *mut RuleNode) -> *mut RuleNode {
    (ptr as usize & !1) as *mut RuleNode
}

/// A refcounted handle to a rule node.
pub struct StrongRuleNode {
    p: NonNull<RuleNode>,
}

unsafe impl Send for StrongRuleNode {}
unsafe impl Sync for StrongRuleNode {}

impl StrongRuleNode {
    /// Takes ownership of a preexisting reference count.
    unsafe fn from_ptr(ptr: *mut RuleNode) -> Self {
        StrongRuleNode {
            p: NonNull::new_unchecked(ptr),
        }
    }

    /// Acquires a new reference to the given node.
    unsafe fn upgrade(ptr: *mut RuleNode) -> Self {
        (*ptr).refcount.fetch_add(1, Ordering::Relaxed);
        StrongRuleNode {
            p: NonNull::new_unchecked(ptr),
        }
    }

    pub(crate) fn get(&self) -> &RuleNode {
        unsafe { self.p.as_ref() }
    }

    /// The parent of this node, if it isn't the root.
    #[inline]
    pub fn parent(&self) -> Option<&StrongRuleNode> {
        self.get().parent.as_ref()
    }

    /// Whether this is the root of the tree.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.get().is_root()
    }

    /// The cascade level this node is positioned at.
    #[inline]
    pub fn cascade_level(&self) -> CascadeLevel {
        self.get().level
    }

    /// The importance of the declarations relevant at this node.
    #[inline]
    pub fn importance(&self) -> Importance {
        self.get().level.importance()
    }

    /// The declarations of this node, or `None` for the root and for nodes
    /// whose declarations have been dropped by their owner and await
    /// collection.
    pub fn style_source(&self) -> Option<StyleSource> {
        self.get().source.as_ref().and_then(WeakStyleSource::upgrade)
    }

    /// Returns an iterator over this node and its ancestors, in order of
    /// decreasing cascade priority.
    pub fn self_and_ancestors(&self) -> SelfAndAncestors {
        SelfAndAncestors {
            current: Some(self),
        }
    }

    /// Returns an iterator over the current children of this node, in
    /// insertion order.
    pub fn children(&self) -> RuleChildrenIterator {
        RuleChildrenIterator {
            current: self.get().first_child.load(Ordering::Acquire),
            _marker: PhantomData,
        }
    }

    /// Returns the child of this node positioned at `level` and holding
    /// `source`'s declarations, inserting it if it doesn't exist yet.
    ///
    /// Lock-free: scans the child list, and appends with a compare-and-swap
    /// on the first null link; a lost race re-examines the link's actual
    /// value and resumes the match-or-append loop. May return a node the
    /// garbage collector is about to remove; that staleness is benign, since
    /// declaration contents are immutable.
    pub fn ensure_child(&self, source: StyleSource, level: CascadeLevel) -> StrongRuleNode {
        debug_assert!(
            level >= self.get().level,
            "cascade levels must be non-decreasing along a path"
        );

        let mut allocated: Option<NonNull<RuleNode>> = None;
        'retry: loop {
            // Scan the existing children for a match.
            let mut last: Option<NonNull<RuleNode>> = None;
            let mut next = self.get().first_child.load(Ordering::Acquire);
            loop {
                let current = strip_mark(next);
                if current.is_null() {
                    break;
                }
                let node = unsafe { &*current };
                if node.level == level && node.source_matches(&source) {
                    if let Some(unused) = allocated.take() {
                        unsafe { drop_never_linked(unused) };
                    }
                    return unsafe { StrongRuleNode::upgrade(current) };
                }
                last = NonNull::new(current);
                next = node.next_sibling.load(Ordering::Acquire);
            }

            // No match; append a fresh node after the last sibling seen.
            let node_ptr = match allocated {
                Some(ptr) => ptr.as_ptr(),
                None => {
                    let ptr =
                        Box::into_raw(Box::new(RuleNode::new(self.clone(), &source, level)));
                    allocated = NonNull::new(ptr);
                    ptr
                },
            };

            let mut link_owner = last;
            loop {
                let link = match link_owner {
                    Some(owner) => unsafe { &(*owner.as_ptr()).next_sibling },
                    None => &self.get().first_child,
                };
                match link.compare_exchange(
                    ptr::null_mut(),
                    node_ptr,
                    Ordering::AcqRel,
                    Ordering::Acquire,
                ) {
                    Ok(..) => return unsafe { StrongRuleNode::from_ptr(node_ptr) },
                    Err(existing) => {
                        if is_marked(existing) {
                            // The link's owner lost a race with the garbage
                            // collector; rescan from the parent.
                            continue 'retry;
                        }
                        let existing_node = unsafe { &*existing };
                        if existing_node.level == level && existing_node.source_matches(&source) {
                            if let Some(unused) = allocated.take() {
                                unsafe { drop_never_linked(unused) };
                            }
                            return unsafe { StrongRuleNode::upgrade(existing) };
                        }
                        link_owner = NonNull::new(existing);
                    },
                }
            }
        }
    }

    /// Writes a debug representation of this node and its descendants.
    pub fn dump<W: Write>(&self, writer: &mut W, indent: usize) {
        const INDENT_INCREMENT: usize = 4;
        for _ in 0..indent {
            let _ = write!(writer, " ");
        }
        let node = self.get();
        let source_state = match node.source {
            Some(ref source) if source.is_alive() => "live",
            Some(..) => "dead",
            None => "none",
        };
        let _ = writeln!(
            writer,
            "{:?} (refs: {}, source: {})",
            node.level,
            node.refcount.load(Ordering::Relaxed),
            source_state,
        );
        for child in self.children() {
            child.dump(writer, indent + INDENT_INCREMENT);
        }
    }
}

/// Drops a node that was allocated in `ensure_child` but lost the insertion
/// race before ever being linked.
unsafe fn drop_never_linked(ptr: NonNull<RuleNode>) {
    drop(Box::from_raw(ptr.as_ptr()));
}

impl Clone for StrongRuleNode {
    fn clone(&self) -> Self {
        unsafe { StrongRuleNode::upgrade(self.p.as_ptr()) }
    }
}

impl Drop for StrongRuleNode {
    fn drop(&mut self) {
        let node = self.get();
        if node.refcount.fetch_sub(1, Ordering::Release) == 1 && !node.is_root() {
            node.request_gc();
        }
    }
}

impl PartialEq for StrongRuleNode {
    fn eq(&self, other: &Self) -> bool {
        self.p == other.p
    }
}

impl Eq for StrongRuleNode {}

impl fmt::Debug for StrongRuleNode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "StrongRuleNode({:?}, {:p})", self.cascade_level(), self.p)
    }
}

/// An iterator over a rule node and its ancestors.
#[derive(Clone)]
pub struct SelfAndAncestors<'a> {
    current: Option<&'a StrongRuleNode>,
}

impl<'a> Iterator for SelfAndAncestors<'a> {
    type Item = &'a StrongRuleNode;

    fn next(&mut self) -> Option<Self::Item> {
        self.current.map(|node| {
            self.current = node.parent();
            node
        })
    }
}

/// An iterator over the children of a rule node. Tolerates concurrent
/// insertion and collection; a child unlinked mid-iteration remains
/// traversable until the sweep after the one that unlinked it.
pub struct RuleChildrenIterator<'a> {
    current: *mut RuleNode,
    _marker: PhantomData<&'a StrongRuleNode>,
}

impl<'a> Iterator for RuleChildrenIterator<'a> {
    type Item = StrongRuleNode;

    fn next(&mut self) -> Option<Self::Item> {
        let current = strip_mark(self.current);
        if current.is_null() {
            return None;
        }
        let node = unsafe { &*current };
        self.current = node.next_sibling.load(Ordering::Acquire);
        Some(unsafe { StrongRuleNode::upgrade(current) })
    }
}

impl RuleTree {
    /// Creates a new rule tree with a fresh root.
    pub fn new() -> Self {
        let root = Box::into_raw(Box::new(RuleNode::root()));
        RuleTree {
            root: ManuallyDrop::new(unsafe { StrongRuleNode::from_ptr(root) }),
            gc: Mutex::new(GcState::default()),
            constructions: AtomicUsize::new(0),
        }
    }

    /// The root node of the tree; it carries no declarations.
    #[inline]
    pub fn root(&self) -> &StrongRuleNode {
        &self.root
    }

    /// Runs a GC sweep if enough rule nodes have been constructed since the
    /// last one, or if some node requested it eagerly.
    pub fn maybe_gc(&self) {
        let constructions = self.constructions.fetch_add(1, Ordering::Relaxed) + 1;
        let requested = self.root.get().gc_requested.load(Ordering::Acquire);
        if constructions >= RULE_TREE_GC_INTERVAL || requested {
            self.constructions.store(0, Ordering::Relaxed);
            self.gc();
        }
    }

    /// Sweeps the tree, splicing out nodes whose declarations are gone and
    /// which no computed style references anymore.
    ///
    /// Non-blocking with respect to concurrent insertion: insertion retries
    /// around the (marked) links of nodes being removed. Nodes unlinked here
    /// stay allocated until the next sweep, and longer if a racing traversal
    /// picked up a handle in the meantime.
    pub fn gc(&self) {
        let mut state = self.gc.lock();

        // Reclaim the previous generation first.
        let previous = mem::take(&mut state.graveyard);
        for ptr in previous {
            let refcount = unsafe { (*ptr).refcount.load(Ordering::Acquire) };
            if refcount == 0 {
                unsafe { drop(Box::from_raw(ptr)) };
            } else {
                // A traversal resurrected the node after it was unlinked;
                // keep it around until the handle goes away.
                state.graveyard.push(ptr);
            }
        }

        let mut removed = 0;
        Self::sweep(self.root.get(), &mut state.graveyard, &mut removed);
        if removed != 0 {
            debug!("rule tree gc: unlinked {} nodes", removed);
        }
    }

    /// Sweeps the subtree under `parent`, children-first, unlinking every
    /// dead node. Holding the GC lock, this is the only writer of non-null
    /// links, so the splice CAS cannot fail.
    fn sweep(parent: &RuleNode, graveyard: &mut Vec<*mut RuleNode>, removed: &mut usize) {
        parent.gc_requested.store(false, Ordering::Release);

        let mut link: &AtomicPtr<RuleNode> = &parent.first_child;
        let mut current = strip_mark(link.load(Ordering::Acquire));
        while !current.is_null() {
            let node = unsafe { &*current };
            Self::sweep(node, graveyard, removed);

            let dead = node.refcount.load(Ordering::Acquire) == 0 &&
                node.source.as_ref().map_or(false, |source| !source.is_alive());
            if dead {
                let next = node.mark_next_sibling();
                let unlinked = link
                    .compare_exchange(current, next, Ordering::AcqRel, Ordering::Acquire)
                    .is_ok();
                debug_assert!(unlinked, "someone else wrote a non-null link");
                if unlinked {
                    graveyard.push(current);
                    *removed += 1;
                    current = strip_mark(next);
                    continue;
                }
            }

            link = &node.next_sibling;
            current = strip_mark(link.load(Ordering::Acquire));
        }
    }

    unsafe fn drop_subtree(node: &RuleNode) {
        let mut current = strip_mark(node.first_child.load(Ordering::Relaxed));
        while !current.is_null() {
            let child = &*current;
            Self::drop_subtree(child);
            let next = strip_mark(child.next_sibling.load(Ordering::Relaxed));
            debug_assert_eq!(
                child.refcount.load(Ordering::Relaxed),
                0,
                "dropping the rule tree while an external handle survives"
            );
            drop(Box::from_raw(current));
            current = next;
        }
    }
}

impl Default for RuleTree {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RuleTree {
    fn drop(&mut self) {
        {
            let mut state = self.gc.lock();
            for ptr in mem::take(&mut state.graveyard) {
                unsafe {
                    debug_assert_eq!((*ptr).refcount.load(Ordering::Relaxed), 0);
                    drop(Box::from_raw(ptr));
                }
            }
        }
        unsafe {
            let strong = ManuallyDrop::take(&mut self.root);
            let root = strong.p.as_ptr();
            mem::forget(strong);
            Self::drop_subtree(&*root);
            debug_assert_eq!(
                (*root).refcount.load(Ordering::Relaxed),
                1,
                "dropping the rule tree while an external handle survives"
            );
            drop(Box::from_raw(root));
        }
    }
}

impl fmt::Debug for RuleTree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("RuleTree").finish_non_exhaustive()
    }
}
