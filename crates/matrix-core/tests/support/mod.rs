#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::rc::Rc;

use async_trait::async_trait;
use matrix_core::api::{ApiReply, TaskApi};
use matrix_core::board::{AddTaskModal, BoardView, Delay};
use matrix_core::config::ClientConfig;
use matrix_core::error::{ApiOp, RequestFailed};
use matrix_core::notice::{Notice, Notifier};
use matrix_core::orchestrator::{Orchestrator, Ports};
use matrix_core::render::TaskCard;
use matrix_core::session::Session;
use matrix_core::{ApiEnvelope, Quadrant, TaskCreate, TaskDto, TaskId};
use tokio::sync::oneshot;

pub const Q1: Quadrant = Quadrant::UrgentImportant;
pub const Q2: Quadrant = Quadrant::NotUrgentImportant;
pub const Q3: Quadrant = Quadrant::UrgentNotImportant;
pub const Q4: Quadrant = Quadrant::NotUrgentNotImportant;

pub fn id(raw: &str) -> TaskId {
    TaskId::new(raw)
}

pub fn task(raw_id: &str, content: &str, quadrant: Quadrant) -> TaskDto {
    TaskDto {
        id: id(raw_id),
        content: content.to_string(),
        quadrant,
        completed: false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryCard {
    pub id: TaskId,
    pub inner_html: String,
    pub fading: bool,
    pub dragging: bool,
}

#[derive(Debug, Default)]
struct MemoryList {
    cards: Vec<MemoryCard>,
    placeholders: usize,
}

/// In-memory stand-in for the quadrant lists of the page.
#[derive(Debug)]
pub struct MemoryBoard {
    lists: RefCell<BTreeMap<Quadrant, MemoryList>>,
    hints: RefCell<BTreeSet<Quadrant>>,
    removed: RefCell<Vec<TaskId>>,
}

impl MemoryBoard {
    /// Four lists, each seeded with the given cards and a placeholder when empty.
    pub fn with_cards(cards: &[(&str, Quadrant)]) -> Self {
        let mut lists: BTreeMap<Quadrant, MemoryList> = Quadrant::ALL
            .iter()
            .map(|quadrant| (*quadrant, MemoryList::default()))
            .collect();
        for (raw_id, quadrant) in cards {
            if let Some(list) = lists.get_mut(quadrant) {
                list.cards.push(MemoryCard {
                    id: id(raw_id),
                    inner_html: format!("<p class=\"task-content\">{raw_id}</p>"),
                    fading: false,
                    dragging: false,
                });
            }
        }
        for list in lists.values_mut() {
            list.placeholders = usize::from(list.cards.is_empty());
        }
        Self {
            lists: RefCell::new(lists),
            hints: RefCell::new(BTreeSet::new()),
            removed: RefCell::new(vec![]),
        }
    }

    pub fn empty() -> Self {
        Self::with_cards(&[])
    }

    pub fn ids_in(&self, quadrant: Quadrant) -> Vec<String> {
        self.lists
            .borrow()
            .get(&quadrant)
            .map(|list| {
                list.cards
                    .iter()
                    .map(|card| card.id.as_str().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn placeholders_in(&self, quadrant: Quadrant) -> usize {
        self.lists
            .borrow()
            .get(&quadrant)
            .map(|list| list.placeholders)
            .unwrap_or_default()
    }

    pub fn card(&self, raw_id: &str) -> Option<MemoryCard> {
        let wanted = id(raw_id);
        self.lists
            .borrow()
            .values()
            .flat_map(|list| list.cards.iter())
            .find(|card| card.id == wanted)
            .cloned()
    }

    pub fn hinted(&self) -> Vec<Quadrant> {
        self.hints.borrow().iter().copied().collect()
    }

    pub fn removal_order(&self) -> Vec<String> {
        self.removed
            .borrow()
            .iter()
            .map(|id| id.as_str().to_string())
            .collect()
    }

    /// Simulates another actor adding a stray placeholder.
    pub fn push_raw_placeholder(&self, quadrant: Quadrant) {
        if let Some(list) = self.lists.borrow_mut().get_mut(&quadrant) {
            list.placeholders += 1;
        }
    }

    /// Simulates the card disappearing behind the orchestrator's back.
    pub fn drop_raw(&self, raw_id: &str) {
        let wanted = id(raw_id);
        for list in self.lists.borrow_mut().values_mut() {
            list.cards.retain(|card| card.id != wanted);
        }
    }

    pub fn assert_placeholders_match_cards(&self) {
        for (quadrant, list) in self.lists.borrow().iter() {
            let expected = usize::from(list.cards.is_empty());
            assert_eq!(
                list.placeholders, expected,
                "quadrant {quadrant} has {} cards and {} placeholders",
                list.cards.len(),
                list.placeholders
            );
        }
    }

    fn with_card<R>(&self, wanted: &TaskId, f: impl FnOnce(&mut MemoryCard) -> R) -> Option<R> {
        self.lists
            .borrow_mut()
            .values_mut()
            .flat_map(|list| list.cards.iter_mut())
            .find(|card| &card.id == wanted)
            .map(f)
    }
}

impl BoardView for MemoryBoard {
    fn card_quadrant(&self, wanted: &TaskId) -> Option<Quadrant> {
        self.lists
            .borrow()
            .iter()
            .find(|(_, list)| list.cards.iter().any(|card| &card.id == wanted))
            .map(|(quadrant, _)| *quadrant)
    }

    fn card_count(&self, quadrant: Quadrant) -> usize {
        self.lists
            .borrow()
            .get(&quadrant)
            .map(|list| list.cards.len())
            .unwrap_or_default()
    }

    fn placeholder_count(&self, quadrant: Quadrant) -> usize {
        self.placeholders_in(quadrant)
    }

    fn insert_placeholder(&self, quadrant: Quadrant) {
        self.push_raw_placeholder(quadrant);
    }

    fn remove_placeholders(&self, quadrant: Quadrant) {
        if let Some(list) = self.lists.borrow_mut().get_mut(&quadrant) {
            list.placeholders = 0;
        }
    }

    fn append_card(&self, card: &TaskCard) -> bool {
        let mut lists = self.lists.borrow_mut();
        let Some(list) = lists.get_mut(&card.quadrant) else {
            return false;
        };
        list.cards.push(MemoryCard {
            id: card.id.clone(),
            inner_html: card.inner_html.clone(),
            fading: false,
            dragging: false,
        });
        true
    }

    fn remove_card(&self, wanted: &TaskId) -> bool {
        let mut found = false;
        for list in self.lists.borrow_mut().values_mut() {
            let before = list.cards.len();
            list.cards.retain(|card| &card.id != wanted);
            found |= list.cards.len() != before;
        }
        if found {
            self.removed.borrow_mut().push(wanted.clone());
        }
        found
    }

    fn relocate_card(&self, wanted: &TaskId, quadrant: Quadrant) -> bool {
        let mut lists = self.lists.borrow_mut();
        let mut moving = None;
        for list in lists.values_mut() {
            if let Some(index) = list.cards.iter().position(|card| &card.id == wanted) {
                moving = Some(list.cards.remove(index));
                break;
            }
        }
        match (moving, lists.get_mut(&quadrant)) {
            (Some(card), Some(target)) => {
                target.cards.push(card);
                true
            }
            _ => false,
        }
    }

    fn set_card_fading(&self, wanted: &TaskId, fading: bool) -> bool {
        self.with_card(wanted, |card| card.fading = fading).is_some()
    }

    fn set_card_dragging(&self, wanted: &TaskId, dragging: bool) {
        self.with_card(wanted, |card| card.dragging = dragging);
    }

    fn set_drop_hint(&self, quadrant: Quadrant, active: bool) {
        let mut hints = self.hints.borrow_mut();
        if active {
            hints.insert(quadrant);
        } else {
            hints.remove(&quadrant);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Add(TaskCreate),
    Complete(TaskId),
    Delete(TaskId),
    Move(TaskId, Quadrant),
}

pub enum Reply {
    Ok,
    Fail(u16),
    /// Held until the test sends `true` (success) or `false` (failure).
    Gate(oneshot::Receiver<bool>),
}

pub enum AddReply {
    Task(TaskDto),
    Fail(u16),
    NoData,
}

/// API double answering from per-task scripts; unscripted calls succeed.
#[derive(Default)]
pub struct ScriptedApi {
    calls: RefCell<Vec<Call>>,
    adds: RefCell<VecDeque<AddReply>>,
    replies: RefCell<HashMap<TaskId, VecDeque<Reply>>>,
}

impl ScriptedApi {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn script_add(&self, reply: AddReply) {
        self.adds.borrow_mut().push_back(reply);
    }

    pub fn script(&self, raw_id: &str, reply: Reply) {
        self.replies
            .borrow_mut()
            .entry(id(raw_id))
            .or_default()
            .push_back(reply);
    }

    pub fn gate(&self, raw_id: &str) -> oneshot::Sender<bool> {
        let (tx, rx) = oneshot::channel();
        self.script(raw_id, Reply::Gate(rx));
        tx
    }

    async fn answer(&self, op: ApiOp, task_id: &TaskId) -> Result<ApiReply, RequestFailed> {
        let reply = self
            .replies
            .borrow_mut()
            .get_mut(task_id)
            .and_then(VecDeque::pop_front)
            .unwrap_or(Reply::Ok);
        let succeeded = match reply {
            Reply::Ok => true,
            Reply::Fail(status) => {
                return Err(RequestFailed::status(op, Some(task_id.clone()), status));
            }
            Reply::Gate(rx) => rx.await.unwrap_or(false),
        };
        if succeeded {
            Ok(ApiEnvelope::empty())
        } else {
            Err(RequestFailed::status(op, Some(task_id.clone()), 500))
        }
    }
}

#[async_trait(?Send)]
impl TaskApi for ScriptedApi {
    async fn add_task(&self, args: &TaskCreate) -> Result<ApiEnvelope<TaskDto>, RequestFailed> {
        self.calls.borrow_mut().push(Call::Add(args.clone()));
        let reply = self.adds.borrow_mut().pop_front().unwrap_or(AddReply::Fail(503));
        match reply {
            AddReply::Task(task) => Ok(ApiEnvelope::ok(task)),
            AddReply::NoData => Ok(ApiEnvelope::empty()),
            AddReply::Fail(status) => Err(RequestFailed::status(ApiOp::Add, None, status)),
        }
    }

    async fn complete_task(&self, task_id: &TaskId) -> Result<ApiReply, RequestFailed> {
        self.calls.borrow_mut().push(Call::Complete(task_id.clone()));
        self.answer(ApiOp::Complete, task_id).await
    }

    async fn delete_task(&self, task_id: &TaskId) -> Result<ApiReply, RequestFailed> {
        self.calls.borrow_mut().push(Call::Delete(task_id.clone()));
        self.answer(ApiOp::Delete, task_id).await
    }

    async fn move_task(
        &self,
        task_id: &TaskId,
        quadrant: Quadrant,
    ) -> Result<ApiReply, RequestFailed> {
        self.calls
            .borrow_mut()
            .push(Call::Move(task_id.clone(), quadrant));
        self.answer(ApiOp::Move, task_id).await
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    notices: RefCell<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.borrow_mut().push(notice);
    }
}

#[derive(Default)]
pub struct MemoryModal {
    open: Cell<Option<Quadrant>>,
    closes: Cell<usize>,
}

impl MemoryModal {
    pub fn open_for(&self) -> Option<Quadrant> {
        self.open.get()
    }

    pub fn closes(&self) -> usize {
        self.closes.get()
    }
}

impl AddTaskModal for MemoryModal {
    fn open(&self, quadrant: Quadrant) {
        self.open.set(Some(quadrant));
    }

    fn close(&self) {
        self.open.set(None);
        self.closes.set(self.closes.get() + 1);
    }

    fn is_open(&self) -> bool {
        self.open.get().is_some()
    }
}

/// Resolves at once unless `gate` was called, in which case the next
/// sleep waits for the returned sender.
#[derive(Default)]
pub struct InstantDelay {
    slept: RefCell<Vec<u32>>,
    gates: RefCell<VecDeque<oneshot::Receiver<()>>>,
}

impl InstantDelay {
    pub fn slept(&self) -> Vec<u32> {
        self.slept.borrow().clone()
    }

    pub fn gate(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.borrow_mut().push_back(rx);
        tx
    }
}

#[async_trait(?Send)]
impl Delay for InstantDelay {
    async fn sleep(&self, millis: u32) {
        self.slept.borrow_mut().push(millis);
        let gate = self.gates.borrow_mut().pop_front();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
    }
}

pub struct Harness {
    pub api: Rc<ScriptedApi>,
    pub board: Rc<MemoryBoard>,
    pub modal: Rc<MemoryModal>,
    pub notifier: Rc<RecordingNotifier>,
    pub delay: Rc<InstantDelay>,
    pub orchestrator: Orchestrator,
}

impl Harness {
    pub fn new(board: MemoryBoard) -> Self {
        Self::with_config(board, ClientConfig::default())
    }

    pub fn with_config(board: MemoryBoard, config: ClientConfig) -> Self {
        let api = Rc::new(ScriptedApi::default());
        let board = Rc::new(board);
        let modal = Rc::new(MemoryModal::default());
        let notifier = Rc::new(RecordingNotifier::default());
        let delay = Rc::new(InstantDelay::default());

        let ports = Ports {
            api: api.clone(),
            board: board.clone(),
            modal: modal.clone(),
            notifier: notifier.clone(),
            delay: delay.clone(),
        };
        let orchestrator = Orchestrator::new(ports, Session::shared(), &config);

        Self {
            api,
            board,
            modal,
            notifier,
            delay,
            orchestrator,
        }
    }

    pub fn messages(&self) -> Vec<(String, bool)> {
        self.notifier
            .notices()
            .into_iter()
            .map(|notice| {
                let is_error = notice.is_error();
                (notice.message, is_error)
            })
            .collect()
    }
}
