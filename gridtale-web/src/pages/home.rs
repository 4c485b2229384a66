use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub on_play: Callback<()>,
}

#[function_component(HomePage)]
pub fn home_page(props: &Props) -> Html {
    let on_click = {
        let cb = props.on_play.clone();
        Callback::from(move |_| cb.emit(()))
    };

    html! {
        <main id="main" class="page home">
            <h1>{ "Gridtale" }</h1>
            <p>{ "A little grid-puzzle that runs wherever you open it." }</p>
            <button type="button" onclick={on_click}>{ "Play" }</button>
        </main>
    }
}
