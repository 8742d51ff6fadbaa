use lexpos_compiler::{CompileError, Dfa, compile};
use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::{Attribute, Data, DeriveInput, Expr, ExprLit, Meta, parse_macro_input, spanned::Spanned};

/// Compile the patterns attached to each variant into a static lexer table.
///
/// ```ignore
/// #[derive(LexposLexer, Copy, Clone, Default)]
/// enum Tok {
///     #[default]
///     #[pattern(r"\s\s*", skip)]
///     Space,
///     #[token("if")]
///     If,
///     #[pattern(r"\w\w*")]
///     Ident,
/// }
/// ```
///
/// Every `#[token]` or `#[pattern]` attribute is one token definition, in
/// declaration order. Earlier definitions win ties.
#[proc_macro_derive(LexposLexer, attributes(token, pattern, skip))]
pub fn derive_lexpos_lexer(input: TokenStream) -> TokenStream {
    match expand_lexpos_lexer(parse_macro_input!(input as DeriveInput)) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_lexpos_lexer(input: DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let enum_ident = input.ident;
    let data_enum = match input.data {
        Data::Enum(data) => data,
        _ => {
            return Err(syn::Error::new(
                enum_ident.span(),
                "LexposLexer can only be derived for enums",
            ));
        }
    };
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new(
            input.generics.span(),
            "LexposLexer does not support generic enums",
        ));
    }

    let mut specs = Vec::new();

    for variant in &data_enum.variants {
        if !variant.fields.is_empty() {
            return Err(syn::Error::new(
                variant.fields.span(),
                "LexposLexer only supports unit variants",
            ));
        }

        let mut variant_skip = false;
        for attr in &variant.attrs {
            if attr.path().is_ident("skip") {
                if !matches!(attr.meta, Meta::Path(_)) {
                    return Err(syn::Error::new(
                        attr.span(),
                        "skip attribute takes no arguments",
                    ));
                }
                variant_skip = true;
            }
        }

        let mut found_pattern = false;

        for attr in &variant.attrs {
            if attr.path().is_ident("token") || attr.path().is_ident("pattern") {
                found_pattern = true;
                let is_token = attr.path().is_ident("token");
                let pattern = parse_pattern_attr(attr, is_token)?;
                specs.push(SpecDescriptor {
                    variant_ident: variant.ident.clone(),
                    pattern: pattern.pattern,
                    skip: pattern.skip || variant_skip,
                    span: pattern.span,
                });
            }
        }

        if !found_pattern {
            return Err(syn::Error::new(
                variant.ident.span(),
                "Each variant must have a #[token(..)] or #[pattern(..)] attribute",
            ));
        }
    }

    let patterns: Vec<&[u8]> = specs.iter().map(|spec| spec.pattern.as_bytes()).collect();
    let dfa = compile(&patterns).map_err(|err| describe_compile_error(&specs, &enum_ident, err))?;

    emit_codegen(enum_ident, specs, dfa)
}

struct SpecDescriptor {
    variant_ident: syn::Ident,
    pattern: String,
    skip: bool,
    span: Span,
}

struct PatternAttr {
    pattern: String,
    skip: bool,
    /// Span of the string literal, where pattern errors are reported.
    span: Span,
}

fn parse_pattern_attr(attr: &Attribute, is_token: bool) -> syn::Result<PatternAttr> {
    let mut skip = false;
    let mut literal = None;

    match &attr.meta {
        Meta::List(list) => {
            let args: Punctuated<Expr, syn::Token![,]> =
                list.parse_args_with(Punctuated::parse_terminated)?;
            for (index, expr) in args.iter().enumerate() {
                match expr {
                    Expr::Lit(ExprLit {
                        lit: syn::Lit::Str(value),
                        ..
                    }) => {
                        if index != 0 || literal.is_some() {
                            return Err(syn::Error::new(
                                expr.span(),
                                "pattern literal must be the first argument",
                            ));
                        }
                        literal = Some((value.value(), value.span()));
                    }
                    Expr::Path(path) if path.path.is_ident("skip") => {
                        skip = true;
                    }
                    _ => {
                        return Err(syn::Error::new(expr.span(), "unsupported attribute option"));
                    }
                }
            }
        }
        Meta::NameValue(nv) => {
            if let Expr::Lit(ExprLit {
                lit: syn::Lit::Str(lit),
                ..
            }) = &nv.value
            {
                literal = Some((lit.value(), lit.span()));
            } else {
                return Err(syn::Error::new(
                    nv.value.span(),
                    "pattern must be provided as string literal",
                ));
            }
        }
        Meta::Path(_) => {
            return Err(syn::Error::new(
                attr.span(),
                "expected #[token(\"...\")] or #[pattern(\"...\")]",
            ));
        }
    }

    let (mut pattern, span) =
        literal.ok_or_else(|| syn::Error::new(attr.span(), "missing pattern literal"))?;
    if is_token {
        pattern = escape_literal(&pattern);
    }

    Ok(PatternAttr {
        pattern,
        skip,
        span,
    })
}

fn describe_compile_error(
    specs: &[SpecDescriptor],
    enum_ident: &syn::Ident,
    err: CompileError,
) -> syn::Error {
    match &err {
        CompileError::Syntax { pattern, source } => match specs.get(*pattern) {
            Some(spec) => syn::Error::new(
                spec.span,
                format!("invalid pattern {:?}: {source}", spec.pattern),
            ),
            None => syn::Error::new(enum_ident.span(), err.to_string()),
        },
        _ => syn::Error::new(enum_ident.span(), err.to_string()),
    }
}

/// Escape the pattern metacharacters so `input` matches itself only.
fn escape_literal(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len() * 2);
    for ch in input.chars() {
        match ch {
            '.' | '*' | '|' | '(' | ')' | '"' | '\\' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn emit_codegen(
    enum_ident: syn::Ident,
    specs: Vec<SpecDescriptor>,
    dfa: Dfa,
) -> syn::Result<proc_macro2::TokenStream> {
    let token_count = specs.len();
    let states_len = dfa.num_states();

    let token_info = specs.iter().map(|spec| {
        let variant = &spec.variant_ident;
        let skip = spec.skip;
        quote! {
            lexpos::TokenInfo {
                token: #enum_ident::#variant,
                skip: #skip,
            }
        }
    });

    let rows = dfa.rows().iter().map(|row| {
        let targets = row.iter();
        quote! { [#(#targets),*] }
    });

    let accepting = dfa.accepting_states().iter().map(|action| match action {
        Some(action) => {
            let id = action.0;
            quote! { Some(#id) }
        }
        None => quote! { None },
    });

    let expanded = quote! {
        impl #enum_ident {
            pub fn lexer() -> &'static lexpos::CompiledLexer<#enum_ident, #token_count, #states_len> {
                static LEXER: lexpos::CompiledLexer<#enum_ident, #token_count, #states_len> =
                    lexpos::CompiledLexer::from_parts(
                        lexpos::PackedDfa::from_parts(
                            [#(#rows),*],
                            [#(#accepting),*],
                            #states_len,
                        ),
                        [#(#token_info),*],
                    );
                &LEXER
            }
        }
    };

    Ok(expanded)
}
