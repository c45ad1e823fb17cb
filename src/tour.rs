//! The route-ordering problem, shared by every engine.
//!
//! [`TourProblem`] adapts one run's scorer, starting route and operator
//! choices to the [`GaProblem`], [`SaProblem`] and [`MoProblem`] traits, so
//! the engines stay generic and the route semantics live in one place.

use rand::Rng;

use crate::budget::Budget;
use crate::error::Result;
use crate::ga::{Candidate, Crossover, GaProblem, Mutation};
use crate::local_search::{two_opt, TwoOptConfig};
use crate::model::Route;
use crate::nsga::{MoProblem, MoSolution};
use crate::objectives::{Objective, ObjectiveContext};
use crate::optimizer::Strategy;
use crate::progress::{ProgressEvent, ProgressObserver};
use crate::random::random_permutation;
use crate::sa::{NeighborGenerator, NeighborMove, SaProblem};
use crate::scoring::Scorer;

/// One run's view of the route problem.
pub(crate) struct TourProblem<'a> {
    scorer: Scorer<'a>,
    initial: &'a Route,
    budget: &'a Budget,
    strategy: Strategy,
    crossover: Crossover,
    mutation: Mutation,
    neighbor: NeighborMove,
    two_opt: TwoOptConfig,
    polish: bool,
    objectives: Option<(ObjectiveContext<'a>, &'a [Objective])>,
    observer: Option<&'a dyn ProgressObserver>,
}

impl<'a> TourProblem<'a> {
    pub(crate) fn new(
        scorer: Scorer<'a>,
        initial: &'a Route,
        budget: &'a Budget,
        strategy: Strategy,
    ) -> Self {
        Self {
            scorer,
            initial,
            budget,
            strategy,
            crossover: Crossover::default(),
            mutation: Mutation::default(),
            neighbor: NeighborMove::default(),
            two_opt: TwoOptConfig::default(),
            polish: true,
            objectives: None,
            observer: None,
        }
    }

    pub(crate) fn with_operators(mut self, crossover: Crossover, mutation: Mutation) -> Self {
        self.crossover = crossover;
        self.mutation = mutation;
        self
    }

    pub(crate) fn with_neighbor(mut self, neighbor: NeighborMove) -> Self {
        self.neighbor = neighbor;
        self
    }

    /// 2-opt settings for [`polish`](Self::polish). `enabled = false` turns
    /// polishing into a no-op.
    pub(crate) fn with_polish(mut self, config: TwoOptConfig, enabled: bool) -> Self {
        self.two_opt = config;
        self.polish = enabled;
        self
    }

    pub(crate) fn with_objectives(
        mut self,
        context: ObjectiveContext<'a>,
        objectives: &'a [Objective],
    ) -> Self {
        self.objectives = Some((context, objectives));
        self
    }

    pub(crate) fn with_observer(mut self, observer: Option<&'a dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub(crate) fn stop_count(&self) -> usize {
        self.initial.len()
    }

    /// Runs 2-opt on `route` under the run budget.
    pub(crate) fn polish(&self, route: Route) -> Route {
        if !self.polish {
            return route;
        }
        two_opt(&route, &self.scorer, &self.two_opt, self.budget).route
    }

    pub(crate) fn report(&self, iteration: usize, best_cost: f64) {
        if let Some(observer) = self.observer {
            observer.on_progress(&ProgressEvent {
                strategy: self.strategy,
                iteration,
                best_cost,
                elapsed: self.budget.elapsed(),
            });
        }
    }

    /// Slot 0 is the starting route, slot 1 its reverse, the rest are
    /// random permutations.
    fn seeded_route<R: Rng>(&self, index: usize, rng: &mut R) -> Route {
        match index {
            0 => self.initial.clone(),
            1 => {
                let mut order = self.initial.order().to_vec();
                order.reverse();
                Route::new(order)
            }
            _ => Route::new(random_permutation(self.stop_count(), rng)),
        }
    }

    fn recombine<R: Rng>(&self, a: &Route, b: &Route, rng: &mut R) -> (Route, Route) {
        let (c1, c2) = self.crossover.apply(a.order(), b.order(), rng);
        (Route::new(c1), Route::new(c2))
    }

    fn perturb<R: Rng>(&self, route: &Route, rng: &mut R) -> Route {
        let mut order = route.order().to_vec();
        self.mutation.apply(&mut order, rng);
        Route::new(order)
    }
}

impl GaProblem for TourProblem<'_> {
    type Individual = Candidate;

    fn create_individual<R: Rng>(&self, index: usize, rng: &mut R) -> Candidate {
        Candidate::new(self.seeded_route(index, rng))
    }

    fn evaluate(&self, candidate: &Candidate) -> f64 {
        self.scorer.cost(&candidate.route)
    }

    fn crossover<R: Rng>(&self, p1: &Candidate, p2: &Candidate, rng: &mut R) -> Vec<Candidate> {
        let (a, b) = self.recombine(&p1.route, &p2.route, rng);
        vec![Candidate::new(a), Candidate::new(b)]
    }

    fn mutate<R: Rng>(&self, candidate: &mut Candidate, rng: &mut R) {
        candidate.route = self.perturb(&candidate.route, rng);
        candidate.fitness = f64::INFINITY;
    }

    fn refine(&self, best: Candidate) -> Candidate {
        Candidate::new(self.polish(best.route))
    }

    fn on_generation(&self, generation: usize, best_fitness: f64) {
        self.report(generation, best_fitness);
    }
}

impl SaProblem for TourProblem<'_> {
    type Solution = Route;

    fn initial_solution<R: Rng>(&self, _rng: &mut R) -> Route {
        self.initial.clone()
    }

    fn cost(&self, route: &Route) -> f64 {
        self.scorer.cost(route)
    }

    fn neighbor<R: Rng>(&self, route: &Route, rng: &mut R) -> Route {
        Route::new(self.neighbor.propose(route.order(), rng))
    }

    fn on_step(&self, step: usize, _temperature: f64, best_cost: f64) {
        self.report(step, best_cost);
    }
}

impl MoProblem for TourProblem<'_> {
    type Solution = Route;

    fn objective_count(&self) -> usize {
        self.objectives.map_or(0, |(_, list)| list.len())
    }

    fn create_solution<R: Rng>(&self, index: usize, rng: &mut R) -> Route {
        self.seeded_route(index, rng)
    }

    fn evaluate(&self, route: &Route) -> Result<Vec<f64>> {
        match self.objectives {
            Some((context, list)) => context.evaluate_all(list, route.order()),
            None => Ok(Vec::new()),
        }
    }

    fn crossover<R: Rng>(&self, a: &Route, b: &Route, rng: &mut R) -> Vec<Route> {
        let (c1, c2) = self.recombine(a, b, rng);
        vec![c1, c2]
    }

    fn mutate<R: Rng>(&self, route: &mut Route, rng: &mut R) {
        *route = self.perturb(route, rng);
    }

    /// Reports the cheapest route on the front, reading the distance
    /// objective when it is configured and scoring the route otherwise.
    fn on_generation(&self, generation: usize, front: &[&MoSolution<Route>]) {
        let slot = self
            .objectives
            .and_then(|(_, list)| list.iter().position(|&o| o == Objective::Distance));
        let best_cost = front
            .iter()
            .map(|member| match slot {
                Some(k) => member.objectives[k],
                None => self.scorer.cost(&member.solution),
            })
            .fold(f64::INFINITY, f64::min);
        self.report(generation, best_cost);
    }
}
