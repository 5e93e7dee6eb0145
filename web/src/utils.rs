use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct ModalProps {
    #[prop_or_default]
    pub children: Html,
}

/// Renders its children straight under `<body>`, above the board.
#[function_component]
pub(crate) fn Modal(props: &ModalProps) -> Html {
    create_portal(props.children.clone(), gloo::utils::body().into())
}

/// Seed for the deck shuffle when none is given in the location hash.
pub(crate) fn js_random_seed() -> u64 {
    let word = || (js_sys::Math::random() * f64::from(u32::MAX)) as u64;
    (word() << 32) | word()
}
