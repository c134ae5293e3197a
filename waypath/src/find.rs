use std::{
    cmp::Ordering,
    collections::BinaryHeap,
    ops::{Add, Deref},
};

/// Represents an absolute cost value, i.e. the cost accumulated from the start of a search
pub trait AbsoluteCost: Copy + Clone + Default + Add<Output = Self> + 'static {
    type CmpContext;
    fn context_cmp(&self, other: &Self, ctx: &Self::CmpContext) -> std::cmp::Ordering;
}

impl AbsoluteCost for f64 {
    type CmpContext = ();

    fn context_cmp(&self, other: &Self, _ctx: &Self::CmpContext) -> std::cmp::Ordering {
        // costs are validated to be finite, total_cmp keeps the heap well-formed regardless
        self.total_cmp(other)
    }
}

/// Supertrait that collects all the requirements on the NodeReference values
/// Must be copy, comparable and not references (hence 'static)
pub trait NodeReference: Copy + Eq + 'static {}

pub trait MapTrait {
    /// The type that can be used to reference nodes in the map
    type Reference: NodeReference;

    /// The type that the map uses for storage
    type Storage<T: Default + Copy + Clone + 'static>: MapStorage<T, Reference = Self::Reference>;

    /// The cost of moving from one node to a neighbor
    type Cost: AbsoluteCost;

    /// Check if the provided node reference is valid
    fn is_valid(&self, node: Self::Reference) -> bool;

    /// Return an iterator over the neighbors of the provided node and the cost required to go there
    fn neighbors_of(
        &self,
        node: Self::Reference,
    ) -> impl Iterator<Item = (Self::Reference, Self::Cost)>;

    /// Create a storage for values of type T
    fn create_storage<T: Default + Copy + Clone + 'static>(&self) -> Self::Storage<T>;
}

pub trait MapStorage<T> {
    type Reference: NodeReference;

    fn get(&self, node: Self::Reference) -> T;
    fn get_mut(&mut self, node: Self::Reference) -> &mut T;
}

/// The objects that we store in the priority queue
#[derive(Debug)]
struct ToVisit<C: AbsoluteCost, R: Eq> {
    context: C::CmpContext,
    cost: C,
    point: R,
    from: Option<R>,
}

impl<C: AbsoluteCost, R: Eq> Ord for ToVisit<C, R> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.cost.context_cmp(&other.cost, &self.context).reverse() // reverse for BinaryHeap to be a min-heap
    }
}

impl<C: AbsoluteCost, R: Eq> PartialOrd for ToVisit<C, R> {
    fn partial_cmp(&self, other: &ToVisit<C, R>) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C: AbsoluteCost, R: Eq> PartialEq for ToVisit<C, R> {
    fn eq(&self, other: &ToVisit<C, R>) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<C: AbsoluteCost, R: Eq> Eq for ToVisit<C, R> {}

#[derive(Clone, Copy, Debug)]
pub struct VisitedItem<C, R> {
    pub cost: C,
    pub from: Option<R>,
}

#[derive(Clone, Copy, Debug)]
pub struct Visited<C, R>(Option<VisitedItem<C, R>>);

impl<C, R> Default for Visited<C, R> {
    fn default() -> Self {
        Visited(None)
    }
}
impl<C, R> Deref for Visited<C, R> {
    type Target = Option<VisitedItem<C, R>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct PathResult<C, R> {
    pub path: Vec<R>,
    pub total_cost: C,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PathFinderState<C, R> {
    Computing,
    NoPathFound,
    PathFound(PathResult<C, R>),
}

impl<C, R> PathFinderState<C, R> {
    pub fn is_done(&self) -> bool {
        !matches!(self, PathFinderState::Computing)
    }
}

/// Uniform-cost search over any [`MapTrait`]. The search can be driven one expansion at a time
/// with [`PathFinder::step`] or run to completion with [`PathFinder::finish`].
#[derive(Debug)]
pub struct PathFinder<
    R: NodeReference,
    K, // the context for contextord
    C: AbsoluteCost<CmpContext = K>,
    S: MapStorage<Visited<C, R>, Reference = R>,
    M: MapTrait<Reference = R, Storage<Visited<C, R>> = S, Cost = C>,
> {
    goal: R,
    context: K,
    visited: S,
    visit_list: BinaryHeap<ToVisit<C, R>>,
    state: PathFinderState<C, R>,
    expanded: usize,
    _map: std::marker::PhantomData<M>,
}

impl<
        R: NodeReference,
        K: Clone, // the context for contextord
        C: AbsoluteCost<CmpContext = K>,
        S: MapStorage<Visited<C, R>, Reference = R>,
        M: MapTrait<Reference = R, Storage<Visited<C, R>> = S, Cost = C>,
    > PathFinder<R, K, C, S, M>
{
    pub fn new(start: R, goal: R, visited: S, context: K) -> Self {
        Self {
            goal,
            visited,
            context: context.clone(),
            visit_list: BinaryHeap::from([ToVisit {
                context,
                cost: Default::default(),
                point: start,
                from: None,
            }]),
            state: PathFinderState::Computing,
            expanded: 0,
            _map: std::marker::PhantomData,
        }
    }

    pub fn finish(mut self, map: &M) -> (PathFinderState<C, R>, S) {
        loop {
            match self.step(map) {
                PathFinderState::Computing => {}
                s => return (s, self.visited),
            }
        }
    }

    pub fn step(&mut self, map: &M) -> PathFinderState<C, R> {
        if self.state.is_done() {
            return self.state.clone();
        }
        if let Some(visit) = self.visit_list.pop() {
            // stale entry, a cheaper route to this point was already expanded
            if self.visited.get(visit.point).is_some() {
                return self.state.clone();
            }

            *self.visited.get_mut(visit.point) = Visited(Some(VisitedItem {
                cost: visit.cost,
                from: visit.from,
            }));
            self.expanded += 1;

            // the goal is settled the moment it is popped
            if visit.point == self.goal {
                self.state = PathFinderState::PathFound(PathResult {
                    path: self.backtrack(),
                    total_cost: visit.cost,
                });

                return self.state.clone();
            }

            for (point, move_cost) in map.neighbors_of(visit.point) {
                if self.visited.get(point).is_none() {
                    self.visit_list.push(ToVisit {
                        context: self.context.clone(),
                        cost: visit.cost + move_cost,
                        point,
                        from: Some(visit.point),
                    });
                }
            }
        } else {
            self.state = PathFinderState::NoPathFound;
        }

        self.state.clone()
    }

    /// Walk the predecessor records from the goal back to the start
    fn backtrack(&self) -> Vec<R> {
        let mut path: Vec<R> = vec![self.goal];

        let mut previous_visit = self.visited.get(self.goal);

        loop {
            previous_visit = match previous_visit {
                Visited(Some(VisitedItem { from: None, .. })) => {
                    // we found the starting point, we are done
                    break;
                }
                Visited(Some(VisitedItem {
                    from: Some(from), ..
                })) => {
                    path.push(from);
                    self.visited.get(from)
                }
                Visited(None) => {
                    panic!("Backtracking lead to a Point that was never visited")
                }
            }
        }

        path.reverse();
        path
    }

    pub fn state(&self) -> &PathFinderState<C, R> {
        &self.state
    }

    /// Number of points settled so far
    pub fn expanded(&self) -> usize {
        self.expanded
    }
}
