use std::collections::HashSet;

use chrono::NaiveDate;
use log::debug;
use ratatui::widgets::ListState;

use crate::dispatch::{Outcome, Response, TaskRequests, Ticket};
use crate::form::{Field, FormErrors, TaskForm};
use crate::model::Task;

pub const TASK_ID_REQUIRED: &str = "Task ID is required";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    List,
    Details(String),
    Create,
}

/// The lifecycle of one screen's data.
#[derive(Debug, Clone, PartialEq)]
pub enum Load<T> {
    Loading,
    Failed(String),
    Loaded(T),
}

pub struct ListScreen {
    pub state: Load<Vec<Task>>,
    pub cursor: usize,
    pub list_state: ListState,
    pending: Option<Ticket>,
}

impl ListScreen {
    fn mount(requests: &mut impl TaskRequests) -> Self {
        Self {
            state: Load::Loading,
            cursor: 0,
            list_state: ListState::default(),
            pending: Some(requests.fetch_all()),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        match &self.state {
            Load::Loaded(tasks) => tasks.as_slice(),
            _ => &[],
        }
    }

    pub fn selected(&self) -> Option<&Task> {
        self.tasks().get(self.cursor)
    }

    pub fn move_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.list_state.select(Some(self.cursor));
        }
    }

    pub fn move_down(&mut self) {
        let len = self.tasks().len();
        if len > 0 && self.cursor < len - 1 {
            self.cursor += 1;
            self.list_state.select(Some(self.cursor));
        }
    }

    fn reload(&mut self, requests: &mut impl TaskRequests) {
        if self.pending.is_some() {
            return;
        }
        self.state = Load::Loading;
        self.pending = Some(requests.fetch_all());
    }

    fn receive(&mut self, result: Result<Vec<Task>, String>) {
        self.pending = None;
        match result {
            Ok(tasks) => {
                if tasks.is_empty() {
                    self.cursor = 0;
                    self.list_state.select(None);
                } else {
                    self.cursor = self.cursor.min(tasks.len() - 1);
                    self.list_state.select(Some(self.cursor));
                }
                self.state = Load::Loaded(tasks);
            }
            Err(message) => self.state = Load::Failed(message),
        }
    }
}

pub struct DetailsScreen {
    pub id: String,
    pub state: Load<Option<Task>>,
    pending: Option<Ticket>,
}

impl DetailsScreen {
    fn mount(id: String, requests: &mut impl TaskRequests) -> Self {
        let mut screen = Self {
            id,
            state: Load::Loading,
            pending: None,
        };
        screen.reload(requests);
        screen
    }

    fn reload(&mut self, requests: &mut impl TaskRequests) {
        if self.pending.is_some() {
            return;
        }
        if self.id.is_empty() {
            self.state = Load::Failed(TASK_ID_REQUIRED.to_string());
            return;
        }
        self.state = Load::Loading;
        self.pending = Some(requests.fetch_one(&self.id));
    }

    fn receive(&mut self, result: Result<Option<Task>, String>) {
        self.pending = None;
        self.state = match result {
            Ok(task) => Load::Loaded(task),
            Err(message) => Load::Failed(message),
        };
    }
}

pub struct CreateScreen {
    pub form: TaskForm,
    pub focused: Field,
    pub errors: FormErrors,
    pub touched: HashSet<Field>,
    pub submitting: bool,
    pub error: Option<String>,
    today: NaiveDate,
    pending: Option<Ticket>,
}

impl CreateScreen {
    pub fn new(today: NaiveDate) -> Self {
        let form = TaskForm::default();
        let errors = form.validate(today);
        Self {
            form,
            focused: Field::Title,
            errors,
            touched: HashSet::new(),
            submitting: false,
            error: None,
            today,
            pending: None,
        }
    }

    /// The error to show next to `field`; untouched fields stay quiet.
    pub fn visible_error(&self, field: Field) -> Option<&str> {
        if self.touched.contains(&field) {
            self.errors.get(field)
        } else {
            None
        }
    }

    pub fn can_submit(&self) -> bool {
        self.errors.is_empty() && !self.submitting
    }

    pub fn next_field(&mut self) {
        let i = Field::ALL.iter().position(|f| *f == self.focused).unwrap_or(0);
        self.focused = Field::ALL[(i + 1) % Field::ALL.len()];
    }

    pub fn prev_field(&mut self) {
        let n = Field::ALL.len();
        let i = Field::ALL.iter().position(|f| *f == self.focused).unwrap_or(0);
        self.focused = Field::ALL[(i + n - 1) % n];
    }

    /// Apply an edit to the focused field and re-run every rule.
    fn edit(&mut self, apply: impl FnOnce(&mut TaskForm, Field)) {
        if self.submitting {
            return;
        }
        apply(&mut self.form, self.focused);
        self.touched.insert(self.focused);
        self.errors = self.form.validate(self.today);
    }

    pub fn insert_char(&mut self, c: char) {
        if self.focused.is_choice() {
            if c == ' ' {
                self.cycle(true);
            }
            return;
        }
        self.edit(|form, field| form.value_mut(field).push(c));
    }

    pub fn backspace(&mut self) {
        if self.focused.is_choice() {
            return;
        }
        self.edit(|form, field| {
            form.value_mut(field).pop();
        });
    }

    pub fn clear_field(&mut self) {
        if self.focused.is_choice() {
            return;
        }
        self.edit(|form, field| form.value_mut(field).clear());
    }

    pub fn cycle(&mut self, forward: bool) {
        if !self.focused.is_choice() {
            return;
        }
        self.edit(|form, field| form.cycle(field, forward));
    }

    pub fn set_description(&mut self, text: String) {
        self.focused = Field::Description;
        self.edit(|form, _| form.description = text);
    }

    fn submit(&mut self, requests: &mut impl TaskRequests) {
        self.touched.extend(Field::ALL);
        self.errors = self.form.validate(self.today);
        if !self.can_submit() {
            return;
        }
        match self.form.to_input(self.today) {
            Ok(input) => {
                self.submitting = true;
                self.error = None;
                self.pending = Some(requests.create(input));
            }
            Err(errors) => self.errors = errors,
        }
    }

    /// Returns true when the task was created and the screen should leave.
    fn receive(&mut self, result: Result<Task, String>) -> bool {
        self.pending = None;
        self.submitting = false;
        match result {
            Ok(task) => {
                debug!("created task '{}'", task.id);
                true
            }
            Err(message) => {
                self.error = Some(message);
                false
            }
        }
    }
}

pub enum Screen {
    List(ListScreen),
    Details(DetailsScreen),
    Create(CreateScreen),
}

impl Screen {
    fn pending(&self) -> Option<Ticket> {
        match self {
            Self::List(s) => s.pending,
            Self::Details(s) => s.pending,
            Self::Create(s) => s.pending,
        }
    }
}

pub struct App {
    pub screen: Screen,
    pub show_help: bool,
    today: fn() -> NaiveDate,
}

impl App {
    pub fn new(today: fn() -> NaiveDate, requests: &mut impl TaskRequests) -> Self {
        Self {
            screen: Screen::List(ListScreen::mount(requests)),
            show_help: false,
            today,
        }
    }

    pub fn route(&self) -> Route {
        match &self.screen {
            Screen::List(_) => Route::List,
            Screen::Details(s) => Route::Details(s.id.clone()),
            Screen::Create(_) => Route::Create,
        }
    }

    /// Replace the current screen and mount the new one.
    pub fn navigate(&mut self, route: Route, requests: &mut impl TaskRequests) {
        debug!("navigating to {route:?}");
        self.screen = match route {
            Route::List => Screen::List(ListScreen::mount(requests)),
            Route::Details(id) => Screen::Details(DetailsScreen::mount(id, requests)),
            Route::Create => Screen::Create(CreateScreen::new((self.today)())),
        };
    }

    pub fn reload(&mut self, requests: &mut impl TaskRequests) {
        match &mut self.screen {
            Screen::List(s) => s.reload(requests),
            Screen::Details(s) => s.reload(requests),
            Screen::Create(_) => {}
        }
    }

    pub fn submit(&mut self, requests: &mut impl TaskRequests) {
        if let Screen::Create(s) = &mut self.screen {
            s.submit(requests);
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Feed a response to the screen that asked for it. Responses for screens
    /// that have since been left are dropped.
    pub fn handle_response(&mut self, response: Response, requests: &mut impl TaskRequests) {
        if self.screen.pending() != Some(response.ticket) {
            debug!("dropping stale response {:?} on {:?}", response.ticket, self.route());
            return;
        }
        let created = match (&mut self.screen, response.outcome) {
            (Screen::List(s), Outcome::Tasks(result)) => {
                s.receive(result.map_err(|e| e.to_string()));
                false
            }
            (Screen::Details(s), Outcome::Task(result)) => {
                s.receive(result.map_err(|e| e.to_string()));
                false
            }
            (Screen::Create(s), Outcome::Created(result)) => s.receive(result.map_err(|e| e.to_string())),
            (_, outcome) => {
                debug!("response {:?} does not fit the current screen: {outcome:?}", response.ticket);
                false
            }
        };
        if created {
            self.navigate(Route::List, requests);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::{ApiError, Cause};
    use crate::model::{CreateTaskInput, TaskPriority, TaskStatus};
    use crate::validate::{DEADLINE_IN_PAST, TITLE_TOO_SHORT};
    use reqwest::StatusCode;

    /// Records every call and hands out sequential tickets.
    #[derive(Default)]
    pub struct FakeRequests {
        pub next: u64,
        pub fetch_all: usize,
        pub fetch_one: Vec<String>,
        pub created: Vec<CreateTaskInput>,
    }

    impl FakeRequests {
        fn ticket(&mut self) -> Ticket {
            self.next += 1;
            Ticket::new(self.next)
        }

        pub fn last(&self) -> Ticket {
            Ticket::new(self.next)
        }
    }

    impl TaskRequests for FakeRequests {
        fn fetch_all(&mut self) -> Ticket {
            self.fetch_all += 1;
            self.ticket()
        }

        fn fetch_one(&mut self, id: &str) -> Ticket {
            self.fetch_one.push(id.to_string());
            self.ticket()
        }

        fn create(&mut self, input: CreateTaskInput) -> Ticket {
            self.created.push(input);
            self.ticket()
        }
    }

    pub fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    pub fn make_task(id: &str, title: &str, status: TaskStatus) -> Task {
        Task {
            id: id.to_string(),
            title: title.to_string(),
            description: Some(format!("{title} description")),
            status,
            priority: TaskPriority::Medium,
            deadline: None,
            completed: status == TaskStatus::Completed,
            created_at: Some("2024-01-01T00:00:00Z".to_string()),
        }
    }

    fn server_error() -> Cause {
        Cause::Status(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn respond(app: &mut App, req: &mut FakeRequests, outcome: Outcome) {
        let ticket = req.last();
        app.handle_response(Response { ticket, outcome }, req);
    }

    fn list(app: &App) -> &ListScreen {
        match &app.screen {
            Screen::List(s) => s,
            _ => panic!("expected list screen"),
        }
    }

    fn create(app: &mut App) -> &mut CreateScreen {
        match &mut app.screen {
            Screen::Create(s) => s,
            _ => panic!("expected create screen"),
        }
    }

    #[test]
    fn list_loads_on_mount() {
        let mut req = FakeRequests::default();
        let mut app = App::new(today, &mut req);
        assert_eq!(req.fetch_all, 1);
        assert_eq!(list(&app).state, Load::Loading);

        let tasks = vec![
            make_task("1", "Test Task 1", TaskStatus::Pending),
            make_task("2", "Completed Task", TaskStatus::Completed),
        ];
        respond(&mut app, &mut req, Outcome::Tasks(Ok(tasks.clone())));
        assert_eq!(list(&app).state, Load::Loaded(tasks));
    }

    #[test]
    fn list_failure_then_retry() {
        let mut req = FakeRequests::default();
        let mut app = App::new(today, &mut req);
        respond(&mut app, &mut req, Outcome::Tasks(Err(ApiError::FetchAll(server_error()))));
        assert_eq!(list(&app).state, Load::Failed("Failed to fetch tasks".into()));

        app.reload(&mut req);
        assert_eq!(req.fetch_all, 2);
        assert_eq!(list(&app).state, Load::Loading);
    }

    #[test]
    fn reload_is_ignored_while_a_request_is_pending() {
        let mut req = FakeRequests::default();
        let mut app = App::new(today, &mut req);
        app.reload(&mut req);
        app.reload(&mut req);
        assert_eq!(req.fetch_all, 1);
    }

    #[test]
    fn stale_responses_are_dropped() {
        let mut req = FakeRequests::default();
        let mut app = App::new(today, &mut req);
        let list_ticket = req.last();
        app.navigate(Route::Details("1".into()), &mut req);
        app.handle_response(
            Response {
                ticket: list_ticket,
                outcome: Outcome::Tasks(Ok(vec![])),
            },
            &mut req,
        );
        match &app.screen {
            Screen::Details(s) => assert_eq!(s.state, Load::Loading),
            _ => panic!("expected details screen"),
        }
    }

    #[test]
    fn cursor_clamps_to_loaded_tasks() {
        let mut req = FakeRequests::default();
        let mut app = App::new(today, &mut req);
        let tasks = vec![
            make_task("1", "One", TaskStatus::Pending),
            make_task("2", "Two", TaskStatus::Pending),
        ];
        respond(&mut app, &mut req, Outcome::Tasks(Ok(tasks)));
        if let Screen::List(s) = &mut app.screen {
            s.move_down();
            s.move_down();
            assert_eq!(s.cursor, 1);
            assert_eq!(s.selected().unwrap().id, "2");
            assert_eq!(s.list_state.selected(), Some(1));
            s.move_up();
            s.move_up();
            assert_eq!(s.cursor, 0);
            assert_eq!(s.list_state.selected(), Some(0));
        }
    }

    #[test]
    fn details_fetches_route_id() {
        let mut req = FakeRequests::default();
        let mut app = App::new(today, &mut req);
        app.navigate(Route::Details("7".into()), &mut req);
        assert_eq!(req.fetch_one, vec!["7".to_string()]);

        let task = make_task("7", "Seven", TaskStatus::InProgress);
        respond(&mut app, &mut req, Outcome::Task(Ok(Some(task.clone()))));
        match &app.screen {
            Screen::Details(s) => assert_eq!(s.state, Load::Loaded(Some(task))),
            _ => panic!("expected details screen"),
        }
    }

    #[test]
    fn details_not_found_and_error() {
        let mut req = FakeRequests::default();
        let mut app = App::new(today, &mut req);
        app.navigate(Route::Details("7".into()), &mut req);
        respond(&mut app, &mut req, Outcome::Task(Ok(None)));
        match &app.screen {
            Screen::Details(s) => assert_eq!(s.state, Load::Loaded(None)),
            _ => panic!("expected details screen"),
        }

        app.reload(&mut req);
        respond(&mut app, &mut req, Outcome::Task(Err(ApiError::FetchOne(server_error()))));
        match &app.screen {
            Screen::Details(s) => assert_eq!(s.state, Load::Failed("Failed to fetch task".into())),
            _ => panic!("expected details screen"),
        }
    }

    #[test]
    fn details_without_id_does_not_call_backend() {
        let mut req = FakeRequests::default();
        let mut app = App::new(today, &mut req);
        app.navigate(Route::Details(String::new()), &mut req);
        assert!(req.fetch_one.is_empty());
        match &app.screen {
            Screen::Details(s) => assert_eq!(s.state, Load::Failed(TASK_ID_REQUIRED.into())),
            _ => panic!("expected details screen"),
        }
    }

    #[test]
    fn new_form_is_invalid_but_quiet() {
        let screen = CreateScreen::new(today());
        assert!(!screen.can_submit());
        assert_eq!(screen.visible_error(Field::Title), None);
    }

    #[test]
    fn short_title_shows_error_and_disables_submit() {
        let mut screen = CreateScreen::new(today());
        screen.insert_char('a');
        screen.insert_char('b');
        assert_eq!(screen.visible_error(Field::Title), Some(TITLE_TOO_SHORT));
        assert!(!screen.can_submit());
        screen.insert_char('c');
        assert_eq!(screen.visible_error(Field::Title), None);
        assert!(screen.can_submit());
    }

    #[test]
    fn past_deadline_shows_error_and_disables_submit() {
        let mut screen = CreateScreen::new(today());
        for c in "Valid title".chars() {
            screen.insert_char(c);
        }
        screen.focused = Field::Deadline;
        for c in "2026-10-17".chars() {
            screen.insert_char(c);
        }
        assert_eq!(screen.visible_error(Field::Deadline), Some(DEADLINE_IN_PAST));
        assert!(!screen.can_submit());

        screen.backspace();
        screen.insert_char('8');
        assert_eq!(screen.visible_error(Field::Deadline), None);
        assert!(screen.can_submit());
    }

    #[test]
    fn choice_fields_cycle_and_ignore_typing() {
        let mut screen = CreateScreen::new(today());
        screen.focused = Field::Status;
        screen.insert_char('x');
        assert_eq!(screen.form.status, "pending");
        screen.insert_char(' ');
        assert_eq!(screen.form.status, "in-progress");
        screen.cycle(false);
        assert_eq!(screen.form.status, "pending");
        screen.clear_field();
        assert_eq!(screen.form.status, "pending");
    }

    #[test]
    fn field_focus_wraps() {
        let mut screen = CreateScreen::new(today());
        screen.prev_field();
        assert_eq!(screen.focused, Field::Deadline);
        screen.next_field();
        assert_eq!(screen.focused, Field::Title);
    }

    #[test]
    fn invalid_submit_touches_every_field() {
        let mut req = FakeRequests::default();
        let mut app = App::new(today, &mut req);
        app.navigate(Route::Create, &mut req);
        app.submit(&mut req);
        assert!(req.created.is_empty());
        assert_eq!(create(&mut app).visible_error(Field::Title), Some(TITLE_TOO_SHORT));
    }

    #[test]
    fn valid_submit_sends_exact_values() {
        let mut req = FakeRequests::default();
        let mut app = App::new(today, &mut req);
        app.navigate(Route::Create, &mut req);
        {
            let screen = create(&mut app);
            for c in "Write report".chars() {
                screen.insert_char(c);
            }
            screen.set_description("Quarterly numbers".into());
            screen.focused = Field::Priority;
            screen.cycle(true);
            screen.cycle(true);
            screen.focused = Field::Deadline;
            for c in "2026-11-01".chars() {
                screen.insert_char(c);
            }
        }
        app.submit(&mut req);

        assert_eq!(
            req.created,
            vec![CreateTaskInput {
                title: "Write report".into(),
                description: Some("Quarterly numbers".into()),
                status: TaskStatus::Pending,
                priority: TaskPriority::High,
                deadline: NaiveDate::from_ymd_opt(2026, 11, 1),
            }]
        );
        let screen = create(&mut app);
        assert!(screen.submitting);
        assert!(!screen.can_submit());
    }

    #[test]
    fn edits_are_ignored_while_submitting() {
        let mut req = FakeRequests::default();
        let mut app = App::new(today, &mut req);
        app.navigate(Route::Create, &mut req);
        for c in "abc".chars() {
            create(&mut app).insert_char(c);
        }
        app.submit(&mut req);
        app.submit(&mut req);
        assert_eq!(req.created.len(), 1);
        create(&mut app).insert_char('d');
        assert_eq!(create(&mut app).form.title, "abc");
    }

    #[test]
    fn created_task_navigates_to_list() {
        let mut req = FakeRequests::default();
        let mut app = App::new(today, &mut req);
        app.navigate(Route::Create, &mut req);
        for c in "abc".chars() {
            create(&mut app).insert_char(c);
        }
        app.submit(&mut req);
        respond(
            &mut app,
            &mut req,
            Outcome::Created(Ok(make_task("9", "abc", TaskStatus::Pending))),
        );
        assert_eq!(app.route(), Route::List);
        assert_eq!(req.fetch_all, 2);
    }

    #[test]
    fn failed_create_shows_error_and_reenables_form() {
        let mut req = FakeRequests::default();
        let mut app = App::new(today, &mut req);
        app.navigate(Route::Create, &mut req);
        for c in "abc".chars() {
            create(&mut app).insert_char(c);
        }
        app.submit(&mut req);
        respond(
            &mut app,
            &mut req,
            Outcome::Created(Err(ApiError::Create(server_error()))),
        );
        assert_eq!(app.route(), Route::Create);
        let screen = create(&mut app);
        assert_eq!(screen.error.as_deref(), Some("Failed to create task"));
        assert!(!screen.submitting);
        assert!(screen.can_submit());
    }
}
