use proc_macro::TokenStream;
use proc_macro2::{Ident, Span};
use quote::{format_ident, quote};
use syn::{
    Expr, LitStr, Token, braced,
    parse::{Parse, ParseStream},
    parse_macro_input,
    punctuated::Punctuated,
};

pub fn state_tree_impl(item: TokenStream) -> TokenStream {
    let tree = parse_macro_input!(item as StateTreeInput);
    if tree.entries.is_empty() {
        return syn::Error::new(Span::call_site(), "state_tree! needs at least one state")
            .to_compile_error()
            .into();
    }

    let tree_ident = format_ident!("__tree");
    let mut counter = 0usize;
    let mut statements = Vec::new();
    for entry in &tree.entries {
        entry.expand(&tree_ident, None, &mut counter, &mut statements);
    }

    quote! {
        {
            let mut #tree_ident = StateTree::new();
            let __built = (|| -> ::core::result::Result<(), StateTreeError> {
                #(#statements)*
                ::core::result::Result::Ok(())
            })();
            __built.map(|()| #tree_ident)
        }
    }
    .into()
}

struct StateTreeInput {
    entries: Punctuated<StateEntry, Token![,]>,
}

impl Parse for StateTreeInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        Ok(Self {
            entries: input.parse_terminated(StateEntry::parse, Token![,])?,
        })
    }
}

/// `"name": expr` 或 `"name": expr => { ... }`
struct StateEntry {
    name: LitStr,
    state: Expr,
    children: Option<StateTreeInput>,
}

impl Parse for StateEntry {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let name = input.parse::<LitStr>()?;
        if name.value().is_empty() {
            return Err(syn::Error::new(name.span(), "state name must not be empty"));
        }
        input.parse::<Token![:]>()?;
        let state = input.parse::<Expr>()?;

        let children = if input.peek(Token![=>]) {
            input.parse::<Token![=>]>()?;
            let content;
            braced!(content in input);
            let children = content.parse::<StateTreeInput>()?;
            if children.entries.is_empty() {
                return Err(syn::Error::new(
                    name.span(),
                    "a state declared with `=>` must have at least one sub state",
                ));
            }
            Some(children)
        } else {
            None
        };

        Ok(Self {
            name,
            state,
            children,
        })
    }
}

impl StateEntry {
    fn expand(
        &self,
        tree: &Ident,
        parent: Option<&Ident>,
        counter: &mut usize,
        out: &mut Vec<proc_macro2::TokenStream>,
    ) {
        let id = format_ident!("__state_{}", *counter);
        *counter += 1;

        let Self {
            name,
            state,
            children,
        } = self;
        out.push(match parent {
            Some(parent) => quote! { let #id = #tree.add(#parent, #name, #state)?; },
            None => quote! { let #id = #tree.add_root(#name, #state)?; },
        });

        if let Some(children) = children {
            for child in &children.entries {
                child.expand(tree, Some(&id), counter, out);
            }
        } else {
            // 叶子状态的 id 不会被使用
            out.push(quote! { let _ = #id; });
        }
    }
}
