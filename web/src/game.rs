use crate::scheduler::TimeoutScheduler;
use crate::source::{DEFAULT_ENDPOINT, HttpImageSource};
use crate::utils::*;
use clap::Args;
use gloo::timers::callback::Timeout;
use memento_core as game;
use game::{CardFace, CardId, FallbackImageSource, GamePhase, ImageId, ImageSource};
use rand::prelude::*;
use rand::rngs::SmallRng;
use yew::prelude::*;

/// How long a deal may wait on the image source before it is abandoned.
const DEAL_TIMEOUT_MS: u32 = 10_000;

const GRID_COLUMNS: usize = 4;

pub trait HasUpdate {
    fn has_update(self) -> bool;
}

impl<E> HasUpdate for Result<game::SelectOutcome, E> {
    fn has_update(self) -> bool {
        self.is_ok_and(game::SelectOutcome::has_update)
    }
}

impl<E> HasUpdate for Result<game::ResolveOutcome, E> {
    fn has_update(self) -> bool {
        self.is_ok()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Start,
    Dealt(game::DealRequest, Vec<ImageId>),
    DealTimedOut(game::DealRequest),
    Select(CardId),
    Resolve(game::PendingResolution),
}

fn start_label(loading: bool) -> &'static str {
    if loading { "Loading..." } else { "Start Game" }
}

/// One entry per life the game started with, `true` while that life remains.
fn hearts(lives: game::Lives, max_lives: game::Lives) -> Vec<bool> {
    (0..max_lives).map(|i| i < lives).collect()
}

fn outcome_text(phase: GamePhase, lives: game::Lives) -> Option<(&'static str, String)> {
    match phase {
        GamePhase::Won => Some((
            "You Won! 🎉",
            format!("Congratulations! You found all pairs with {lives} lives remaining!"),
        )),
        GamePhase::Lost => Some((
            "Game Over 😭",
            "You ran out of lives. Try again!".to_string(),
        )),
        GamePhase::NotStarted | GamePhase::Dealing | GamePhase::Playing => None,
    }
}

fn card_classes(face: CardFace, clickable: bool) -> Classes {
    let mut class = classes!(
        "card",
        match face {
            CardFace::Back => classes!(),
            CardFace::Front => classes!("flipped"),
            CardFace::Matched => classes!("flipped", "matched"),
        }
    );
    if !clickable {
        class.push("locked");
    }
    class
}

#[derive(Properties, Clone, PartialEq)]
struct CardProps {
    id: CardId,
    face: CardFace,
    image: ImageId,
    #[prop_or_default]
    clickable: bool,
    callback: Callback<CardId>,
}

#[function_component(CardView)]
fn card_component(props: &CardProps) -> Html {
    let CardProps {
        id,
        face,
        image,
        clickable,
        callback,
    } = props.clone();

    let onclick = Callback::from(move |_: MouseEvent| {
        if clickable {
            log::trace!("card {} clicked", id);
            callback.emit(id);
        }
    });

    html! {
        <div class={card_classes(face, clickable)} {onclick}>
            <div class="back">{"?"}</div>
            <div class="front">
                if face != CardFace::Back {
                    <img src={image.to_string()} alt="Card"/>
                }
            </div>
        </div>
    }
}

#[derive(Properties, Clone, PartialEq)]
struct LivesProps {
    lives: game::Lives,
    max_lives: game::Lives,
}

#[function_component(LivesView)]
fn lives_component(props: &LivesProps) -> Html {
    html! {
        <aside class="lives">
            {
                for hearts(props.lives, props.max_lives).into_iter().map(|filled| html! {
                    <span class={classes!("heart", filled.then_some("filled"))}>{"♥"}</span>
                })
            }
        </aside>
    }
}

#[derive(Args, Properties, Debug, Default, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Endpoint serving random illustrations
    #[arg(long)]
    images: Option<String>,
}

impl GameProps {
    pub(crate) fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub(crate) fn images(&self) -> Option<&str> {
        self.images.as_deref()
    }
}

#[derive(Debug)]
pub(crate) struct GameView {
    game: game::Game<TimeoutScheduler>,
    source: FallbackImageSource<HttpImageSource>,
    rng: SmallRng,
    deal_timeout: Option<Timeout>,
}

impl GameView {
    fn start(&mut self, ctx: &Context<Self>) -> bool {
        let request = self.game.begin_deal();

        self.deal_timeout = Some({
            let link = ctx.link().clone();
            Timeout::new(DEAL_TIMEOUT_MS, move || {
                link.send_message(Msg::DealTimedOut(request))
            })
        });

        let source = self.source.clone();
        let link = ctx.link().clone();
        wasm_bindgen_futures::spawn_local(async move {
            let Ok(images) = source.fetch(request.count().into()).await;
            link.send_message(Msg::Dealt(request, images));
        });

        true
    }

    fn view_board(&self, ctx: &Context<Self>) -> Html {
        let engine = self.game.engine();
        let callback = ctx.link().callback(Msg::Select);
        let style = format!("grid-template-columns: repeat({GRID_COLUMNS}, 1fr)");

        html! {
            <section class="board" {style}>
                {
                    for engine.cards().iter().map(|card| {
                        let id = card.id();
                        html! {
                            <CardView
                                key={id}
                                {id}
                                face={card.face()}
                                image={card.image().clone()}
                                clickable={engine.can_select(id)}
                                callback={callback.clone()}
                            />
                        }
                    })
                }
            </section>
        }
    }

    fn view_outcome(&self, ctx: &Context<Self>) -> Html {
        let engine = self.game.engine();
        let Some((title, message)) = outcome_text(engine.phase(), engine.lives()) else {
            return html! {};
        };
        let cb_play_again = ctx.link().callback(|_: MouseEvent| Msg::Start);

        html! {
            <Modal>
                <dialog class="outcome" open={true}>
                    <article>
                        <h2>{title}</h2>
                        <p>{message}</p>
                        <footer>
                            <button onclick={cb_play_again}>{"Play Again"}</button>
                        </footer>
                    </article>
                </dialog>
            </Modal>
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        let seed = props.seed().unwrap_or_else(js_random_seed);
        let endpoint = props.images().unwrap_or(DEFAULT_ENDPOINT);
        log::debug!("seed: {}, images: {}", seed, endpoint);

        let scheduler = TimeoutScheduler::new(ctx.link().callback(Msg::Resolve));
        Self {
            game: game::Game::new(game::GameConfig::default(), scheduler),
            source: FallbackImageSource::new(HttpImageSource::new(endpoint)),
            rng: SmallRng::seed_from_u64(seed),
            deal_timeout: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            Start => {
                log::debug!("new game");
                self.start(ctx)
            }
            Dealt(request, images) => {
                match self.game.finish_deal(request, &images, &mut self.rng) {
                    Ok(()) => {
                        self.deal_timeout = None;
                        true
                    }
                    Err(game::GameError::StaleDeal) => {
                        log::debug!("late images for deal #{} dropped", request.ticket());
                        false
                    }
                    Err(err) => {
                        self.deal_timeout = None;
                        log::error!("could not deal: {}", err);
                        true
                    }
                }
            }
            DealTimedOut(request) => {
                let updated = self.game.abort_deal(request).is_ok();
                if updated {
                    log::warn!("deal #{} timed out", request.ticket());
                }
                updated
            }
            Select(id) => self.game.select(id).has_update(),
            Resolve(task) => {
                let result = self.game.resolve(task);
                log::debug!("resolution: {:?}", result);
                result.has_update()
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let engine = self.game.engine();
        let loading = engine.is_loading();
        let cb_start = ctx.link().callback(|_: MouseEvent| Msg::Start);

        if !engine.is_started() {
            let lives = engine.config().lives;
            return html! {
                <div class="memento intro">
                    <h1>{"Memory Game"}</h1>
                    <p>{format!("Test your memory by matching pairs of cards. You have {lives} lives!")}</p>
                    <button onclick={cb_start} disabled={loading}>{start_label(loading)}</button>
                </div>
            };
        }

        html! {
            <div class="memento">
                <nav>
                    <LivesView lives={engine.lives()} max_lives={engine.config().lives}/>
                    <button class="outline" onclick={cb_start} disabled={loading}>{"Restart"}</button>
                </nav>
                {self.view_outcome(ctx)}
                {self.view_board(ctx)}
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hearts_fill_remaining_lives() {
        assert_eq!(hearts(6, 6), vec![true; 6]);
        assert_eq!(
            hearts(4, 6),
            vec![true, true, true, true, false, false]
        );
        assert_eq!(hearts(0, 6), vec![false; 6]);
    }

    #[test]
    fn outcome_text_only_for_finished_games() {
        let (title, message) = outcome_text(GamePhase::Won, 3).unwrap();
        assert_eq!(title, "You Won! 🎉");
        assert!(message.contains("with 3 lives remaining"));

        let (title, _) = outcome_text(GamePhase::Lost, 0).unwrap();
        assert_eq!(title, "Game Over 😭");

        assert!(outcome_text(GamePhase::Playing, 6).is_none());
        assert!(outcome_text(GamePhase::Dealing, 6).is_none());
    }

    #[test]
    fn start_label_reflects_loading() {
        assert_eq!(start_label(false), "Start Game");
        assert_eq!(start_label(true), "Loading...");
    }

    #[test]
    fn card_classes_map_faces() {
        assert_eq!(card_classes(CardFace::Back, true), classes!("card"));
        assert_eq!(
            card_classes(CardFace::Matched, false),
            classes!("card", "flipped", "matched", "locked")
        );
    }

    #[test]
    fn select_errors_are_not_updates() {
        let result: Result<game::SelectOutcome, game::GameError> = Err(game::GameError::NotStarted);
        assert!(!result.has_update());
        assert!(!Ok::<_, game::GameError>(game::SelectOutcome::NoChange).has_update());
        assert!(Ok::<_, game::GameError>(game::SelectOutcome::Flipped).has_update());
    }
}
