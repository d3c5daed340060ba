//! Tier Discount Calculator
//!
//! Wires a qualifying-total policy and a percent schedule into the single
//! entry point the host invokes once per cart evaluation. Evaluation is a
//! total function: every snapshot produces a well-formed decision.

use tracing::{debug, info};

use crate::{
    cart::Cart,
    config::Config,
    decision::{self, Decision},
    qualifying::QualifyingTotal,
    tiers::PercentSchedule,
};

/// Evaluates carts against a configured discount rule.
#[derive(Debug)]
pub struct Calculator {
    policy: Box<dyn QualifyingTotal + Send + Sync>,
    schedule: PercentSchedule,
}

impl Calculator {
    /// Build a calculator from merchant configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let schedule = config
            .tiers
            .as_ref()
            .map_or_else(PercentSchedule::default, |tiers| {
                PercentSchedule::new(tiers.clone())
            });

        Self {
            policy: config.total_policy.build(),
            schedule,
        }
    }

    /// Evaluate one cart snapshot.
    ///
    /// Disqualifying input (unparseable costs, empty cart, no threshold met)
    /// yields [`Decision::none`]; nothing in here fails or panics.
    pub fn evaluate(&self, cart: &Cart) -> Decision {
        let Some(amount) = self.policy.compute(cart) else {
            debug!("cart cost could not be parsed as a decimal");
            return Decision::none();
        };

        let Some(percentage) = self.schedule.percentage_for(amount) else {
            info!(%amount, "no discount tier met");
            return Decision::none();
        };

        debug!(%amount, %percentage, "discount tier met");

        decision::percentage_off(percentage, &self.policy.targets(cart))
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
