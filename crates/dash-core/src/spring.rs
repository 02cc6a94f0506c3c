//! Analytic spring values.
//!
//! A [`SpringValue`] animates one scalar toward a goal using the closed-form
//! transition from `oscillator`, so the result is exact for any frame
//! interval. [`SpringVec2`] pairs two independent springs for positions and
//! sizes. [`SpringHandle`] attaches a spring to a [`FrameClock`] so it
//! advances by itself once per repaint.
use crate::constants::{
    DEFAULT_SPRING_DAMPING, DEFAULT_SPRING_SPEED, HARD_CUT_SPEED, SPRING_EPSILON,
};
use crate::frame::{FrameClock, FrameSubscription};
use crate::oscillator::spring_coefficients;
use glam::DVec2;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq)]
pub struct SpringValue {
    goal: f64,
    position: f64,
    displacement: f64,
    velocity: f64,
    prev_displacement: f64,
    prev_velocity: f64,
    damping: f64,
    speed: f64,
    last_update: f64,
}

impl Default for SpringValue {
    fn default() -> Self {
        Self::new(0.0, DEFAULT_SPRING_DAMPING, DEFAULT_SPRING_SPEED, 0.0)
    }
}

#[inline]
fn settled(displacement: f64, velocity: f64) -> bool {
    displacement.abs() <= SPRING_EPSILON && velocity.abs() <= SPRING_EPSILON
}

impl SpringValue {
    /// A spring resting at `goal`. `now` is the time base later passed to
    /// [`SpringValue::update`] (seconds).
    pub fn new(goal: f64, damping: f64, speed: f64, now: f64) -> Self {
        Self {
            goal,
            position: goal,
            displacement: 0.0,
            velocity: 0.0,
            prev_displacement: 0.0,
            prev_velocity: 0.0,
            damping,
            speed,
            last_update: now,
        }
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.position
    }
    #[inline]
    pub fn goal(&self) -> f64 {
        self.goal
    }
    #[inline]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }
    #[inline]
    pub fn displacement(&self) -> f64 {
        self.displacement
    }
    #[inline]
    pub fn damping(&self) -> f64 {
        self.damping
    }
    #[inline]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn is_settled(&self) -> bool {
        settled(self.displacement, self.velocity)
    }

    /// Replace goal and parameters. The displacement is recomputed from the
    /// current position and the velocity is kept, so the output continues
    /// smoothly from where it is.
    pub fn set_target(&mut self, goal: f64, damping: f64, speed: f64) {
        self.displacement = self.position - goal;
        self.prev_displacement = self.displacement;
        self.goal = goal;
        self.damping = damping;
        self.speed = speed;
    }

    pub fn set_goal(&mut self, goal: f64) {
        self.set_target(goal, self.damping, self.speed);
    }

    /// `0.0` freezes the spring in place until a non-zero speed is restored.
    pub fn set_speed(&mut self, speed: f64) {
        self.set_target(self.goal, self.damping, speed);
    }

    /// Hard cut: place the value at `goal` at rest.
    pub fn jump_to(&mut self, goal: f64) {
        self.goal = goal;
        self.position = goal;
        self.displacement = 0.0;
        self.velocity = 0.0;
        self.prev_displacement = 0.0;
        self.prev_velocity = 0.0;
    }

    /// Advance to time `now` (seconds, same base as construction) and return
    /// the new position.
    pub fn update(&mut self, now: f64) -> f64 {
        let elapsed = now - self.last_update;
        let transition = spring_coefficients(elapsed, self.damping, self.speed);
        let (displacement, velocity) =
            transition.apply(self.prev_displacement, self.prev_velocity);

        if settled(displacement, velocity) {
            self.displacement = 0.0;
            self.velocity = 0.0;
            self.position = self.goal;
        } else {
            self.displacement = displacement;
            self.velocity = velocity;
            self.position = self.goal + displacement;
        }

        self.prev_displacement = self.displacement;
        self.prev_velocity = self.velocity;
        self.last_update = self.last_update.max(now);
        self.position
    }
}

/// Two independent scalar springs sharing parameters.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpringVec2 {
    pub x: SpringValue,
    pub y: SpringValue,
}

impl SpringVec2 {
    pub fn new(goal: DVec2, damping: f64, speed: f64, now: f64) -> Self {
        Self {
            x: SpringValue::new(goal.x, damping, speed, now),
            y: SpringValue::new(goal.y, damping, speed, now),
        }
    }

    pub fn value(&self) -> DVec2 {
        DVec2::new(self.x.value(), self.y.value())
    }

    pub fn goal(&self) -> DVec2 {
        DVec2::new(self.x.goal(), self.y.goal())
    }

    pub fn set_goal(&mut self, goal: DVec2) {
        self.x.set_goal(goal.x);
        self.y.set_goal(goal.y);
    }

    pub fn set_target(&mut self, goal: DVec2, damping: f64, speed: f64) {
        self.x.set_target(goal.x, damping, speed);
        self.y.set_target(goal.y, damping, speed);
    }

    pub fn is_settled(&self) -> bool {
        self.x.is_settled() && self.y.is_settled()
    }

    pub fn update(&mut self, now: f64) -> DVec2 {
        DVec2::new(self.x.update(now), self.y.update(now))
    }
}

/// A spring that advances itself on every frame of a [`FrameClock`].
///
/// The spring state is owned by the handle; callers change it only through
/// the handle's methods. Dropping the handle cancels the frame registration.
pub struct SpringHandle {
    spring: Rc<RefCell<SpringValue>>,
    /// Damping and speed to put back once a hard cut has landed.
    restore: Rc<Cell<Option<(f64, f64)>>>,
    frame: FrameSubscription,
}

impl SpringHandle {
    pub fn attach(clock: &FrameClock, goal: f64, damping: f64, speed: f64) -> Self {
        // Frame ticks start at 0 for each consumer, so the spring's time base
        // starts there too.
        let spring = Rc::new(RefCell::new(SpringValue::new(goal, damping, speed, 0.0)));
        let restore: Rc<Cell<Option<(f64, f64)>>> = Rc::new(Cell::new(None));
        let frame = {
            let spring = spring.clone();
            let restore = restore.clone();
            clock.subscribe(move |tick| {
                let mut s = spring.borrow_mut();
                s.update(tick.time);
                if s.is_settled() {
                    if let Some((damping, speed)) = restore.take() {
                        let goal = s.goal();
                        s.set_target(goal, damping, speed);
                    }
                }
            })
        };
        Self {
            spring,
            restore,
            frame,
        }
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.spring.borrow().value()
    }

    pub fn goal(&self) -> f64 {
        self.spring.borrow().goal()
    }

    pub fn is_settled(&self) -> bool {
        self.spring.borrow().is_settled()
    }

    pub fn is_ticking(&self) -> bool {
        self.frame.is_active()
    }

    /// `true` between a [`SpringHandle::hard_cut`] and the frame that lands it.
    pub fn is_cutting(&self) -> bool {
        self.restore.get().is_some()
    }

    /// Explicit parameters replace any pending hard-cut restore.
    pub fn set_target(&self, goal: f64, damping: f64, speed: f64) {
        self.restore.set(None);
        self.spring.borrow_mut().set_target(goal, damping, speed);
    }

    pub fn set_goal(&self, goal: f64) {
        self.spring.borrow_mut().set_goal(goal);
    }

    pub fn set_speed(&self, speed: f64) {
        let damping = self.spring.borrow().damping();
        self.set_target(self.goal(), damping, speed);
    }

    pub fn speed(&self) -> f64 {
        self.spring.borrow().speed()
    }

    pub fn jump_to(&self, goal: f64) {
        self.spring.borrow_mut().jump_to(goal);
    }

    /// Land on `goal` at the next frame instead of animating there. The
    /// spring runs critically damped at [`HARD_CUT_SPEED`] until a tick
    /// settles it, then its own damping and speed come back, so later goal
    /// changes animate again. Without a running clock the value jumps.
    pub fn hard_cut(&self, goal: f64) {
        if !self.frame.is_active() {
            self.jump_to(goal);
            return;
        }
        let mut s = self.spring.borrow_mut();
        // a second cut before the first lands keeps the original parameters
        if self.restore.get().is_none() {
            self.restore.set(Some((s.damping(), s.speed())));
        }
        s.set_target(goal, 1.0, HARD_CUT_SPEED);
    }

    pub fn snapshot(&self) -> SpringValue {
        self.spring.borrow().clone()
    }
}
