//! Courier job: gathers stone into its pack and dumps it into the warehouse.

use std::cell::RefCell;
use std::rc::Rc;

use colony::{
    BuildingHooks, BuildingInventoryContainer, ItemHandler, ItemId, ItemStack, VecItemHandler,
};
use colony_ai::builder::{always, goto, when, when_goto};
use colony_ai::{
    AiState, CitizenStatus, DesiredActivity, Job, Target, TargetFault, Transition, Worker,
};
use tracing::{debug, info};

const STONE: ItemId = ItemId(1);
const STACK_SIZE: u32 = 64;

const WAREHOUSE_SLOTS: usize = 27;
const PLAYER_SLOTS: usize = 36;

/// Stone carried before heading back to the warehouse.
const PACK_CAPACITY: u32 = 24;
const GATHER_PER_TICK: u32 = 3;
const HUNGER_LIMIT: u32 = 8;

#[derive(Debug, Default)]
struct CitizenData {
    activity: DesiredActivity,
    status: CitizenStatus,
    hunger: u32,
}

/// Shared handle on the courier's citizen entity.
#[derive(Clone, Default)]
pub struct Citizen(Rc<RefCell<CitizenData>>);

impl Citizen {
    pub fn set_activity(&self, activity: DesiredActivity) {
        self.0.borrow_mut().activity = activity;
    }
}

impl Worker for Citizen {
    fn desired_activity(&self) -> DesiredActivity {
        self.0.borrow().activity
    }

    fn set_status(&mut self, status: CitizenStatus) {
        let mut data = self.0.borrow_mut();
        if data.status != status {
            debug!(target: "colony_sim::courier", %status, "citizen status changed");
        }
        data.status = status;
    }
}

/// Warehouse reacting to stone being stored.
struct Warehouse;

impl BuildingHooks for Warehouse {
    fn overrule_next_open_request_with_stack(&mut self, stack: &ItemStack) {
        debug!(target: "colony_sim::courier", %stack, "open request overruled");
    }
}

pub struct Courier {
    citizen: Citizen,
    storage: BuildingInventoryContainer<VecItemHandler, VecItemHandler, Warehouse>,
    delivery_requested: bool,
}

impl Courier {
    pub fn new(citizen: &Citizen) -> Self {
        Self {
            citizen: citizen.clone(),
            storage: BuildingInventoryContainer::new(
                VecItemHandler::new(WAREHOUSE_SLOTS),
                VecItemHandler::new(PLAYER_SLOTS),
                Warehouse,
            ),
            delivery_requested: false,
        }
    }

    pub fn request_delivery(&mut self) {
        self.delivery_requested = true;
    }

    /// Stone stored in the warehouse.
    pub fn stored(&self) -> u32 {
        self.storage.building().count_of(STONE)
    }

    fn carried(&self) -> u32 {
        self.storage.player().count_of(STONE)
    }

    fn hunger(&self) -> u32 {
        self.citizen.0.borrow().hunger
    }

    fn eat(&mut self) -> Transition {
        info!(target: "colony_sim::courier", hunger = self.hunger(), "eating");
        self.citizen.0.borrow_mut().hunger = 0;
        Transition::To(AiState::Idle)
    }

    fn gather(&mut self) -> Transition {
        let pack = self.storage.player_mut();
        let slot = (0..pack.slots()).find(|&slot| {
            let stack = pack.stack(slot);
            stack.is_empty() || stack.count() + GATHER_PER_TICK <= stack.max_stack_size()
        });
        if let Some(slot) = slot {
            let current = pack.stack(slot);
            pack.set_stack(
                slot,
                ItemStack::new(STONE, current.count() + GATHER_PER_TICK, STACK_SIZE),
            );
        }
        self.citizen.0.borrow_mut().hunger += 1;

        if self.carried() >= PACK_CAPACITY {
            Transition::To(AiState::Dump)
        } else {
            Transition::None
        }
    }

    /// Shift-clicks every pack slot into the warehouse.
    fn dump(&mut self) -> Result<Transition, TargetFault> {
        let first = self.storage.building_slot_count();
        for index in first..self.storage.slot_count() {
            if !self.storage.stack(index).is_empty() {
                self.storage.transfer_stack_in_slot(index);
            }
        }

        let left = self.carried();
        if left > 0 {
            return Err(TargetFault::failed(format!(
                "warehouse is full, {left} stone left in pack"
            )));
        }
        info!(target: "colony_sim::courier", stored = self.stored(), "pack dumped");
        Ok(Transition::To(AiState::Idle))
    }

    fn start_delivery(&mut self) -> Transition {
        self.delivery_requested = false;
        Transition::To(AiState::Deliver)
    }

    fn hand_over(&mut self) -> Transition {
        info!(target: "colony_sim::courier", "delivery handed over");
        Transition::To(AiState::Idle)
    }
}

impl Job for Courier {
    type Worker = Citizen;

    fn name(&self) -> &str {
        "courier"
    }

    fn citizen_entity(&self) -> Option<Citizen> {
        Some(self.citizen.clone())
    }
}

/// Targets of the courier AI, in evaluation order.
pub fn targets() -> Vec<Target<Courier>> {
    vec![
        when(
            AiState::AiBlockingPrio,
            |courier: &Courier| courier.hunger() >= HUNGER_LIMIT,
            Courier::eat,
        )
        .named("eat"),
        when(
            AiState::Event,
            |courier: &Courier| courier.delivery_requested,
            Courier::start_delivery,
        )
        .named("delivery"),
        goto(AiState::Init, AiState::Idle).named("init"),
        when_goto(
            AiState::Idle,
            |courier: &Courier| courier.carried() >= PACK_CAPACITY,
            AiState::Dump,
        )
        .named("pack full")
        .with_okay_to_eat(true),
        goto(AiState::Idle, AiState::Gathering)
            .named("go gather")
            .with_okay_to_eat(true),
        always(AiState::Gathering, Courier::gather).named("gather"),
        Target::new(AiState::Dump, Courier::dump).named("dump"),
        always(AiState::Deliver, Courier::hand_over).named("hand over"),
    ]
}
