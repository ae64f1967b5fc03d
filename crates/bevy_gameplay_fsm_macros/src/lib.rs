extern crate proc_macro;

mod state_tree;

use proc_macro::TokenStream;

/// 以嵌套语法声明一棵静态状态树
///
/// Declare a static state tree with a nested syntax.
///
/// Expands to a `Result<StateTree<_>, StateTreeError>`; both types must be in
/// scope (they are part of the crate prelude).
///
/// ```ignore
/// let tree = state_tree! {
///     "grounded": Grounded::default() => {
///         "idle": Idle,
///         "run": Run { speed: 6.0 },
///     },
///     "airborne": Airborne,
/// }?;
/// ```
#[proc_macro]
pub fn state_tree(item: TokenStream) -> TokenStream {
    state_tree::state_tree_impl(item)
}
