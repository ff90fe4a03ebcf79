//! Derive macros for `brrtdto`.
//!
//! - `#[derive(Dto)]` on a struct with named fields (or a unit struct) describes
//!   its constructor: one parameter per field, in field order.
//! - `#[derive(BackedEnum)]` on a fieldless enum builds its member table.
//!
//! Both also implement `FieldType`, so derived types can be used as fields of
//! other derived types.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse_macro_input, Attribute, Data, DeriveInput, Expr, ExprLit, ExprUnary, Fields, Ident, Lit,
    LitStr, Result as SynResult, Type, UnOp,
};

#[derive(Default)]
struct TypeAttrs {
    name: Option<LitStr>,
    doc: Option<LitStr>,
}

enum FieldDefault {
    Trait,
    Expr(Expr),
}

#[derive(Default)]
struct FieldAttrs {
    default: Option<FieldDefault>,
    caster: Option<LitStr>,
    doc: Option<LitStr>,
    rename: Option<LitStr>,
}

fn is_dto(attr: &Attribute) -> bool {
    attr.path().is_ident("dto")
}

fn parse_type_attrs(attrs: &[Attribute]) -> SynResult<TypeAttrs> {
    let mut out = TypeAttrs::default();
    for attr in attrs.iter().filter(|a| is_dto(a)) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                out.name = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("doc") {
                out.doc = Some(meta.value()?.parse()?);
            } else {
                return Err(meta.error("expected `name` or `doc`"));
            }
            Ok(())
        })?;
    }
    Ok(out)
}

fn parse_field_attrs(attrs: &[Attribute]) -> SynResult<FieldAttrs> {
    let mut out = FieldAttrs::default();
    for attr in attrs.iter().filter(|a| is_dto(a)) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("default") {
                out.default = Some(if meta.input.peek(syn::Token![=]) {
                    FieldDefault::Expr(meta.value()?.parse()?)
                } else {
                    FieldDefault::Trait
                });
            } else if meta.path.is_ident("caster") {
                out.caster = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("doc") {
                out.doc = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("rename") {
                out.rename = Some(meta.value()?.parse()?);
            } else {
                return Err(meta.error("expected `default`, `caster`, `doc` or `rename`"));
            }
            Ok(())
        })?;
    }
    Ok(out)
}

/// Rust `///` comments joined into one block, if any.
fn doc_comments(attrs: &[Attribute]) -> Option<String> {
    let lines: Vec<String> = attrs
        .iter()
        .filter(|a| a.path().is_ident("doc"))
        .filter_map(|a| match &a.meta {
            syn::Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(s), ..
                }) => Some(s.value().trim().to_string()),
                _ => None,
            },
            _ => None,
        })
        .collect();
    (!lines.is_empty()).then(|| lines.join("\n"))
}

fn type_name(ident: &Ident, attrs: &TypeAttrs) -> String {
    attrs
        .name
        .as_ref()
        .map_or_else(|| ident.to_string(), LitStr::value)
}

fn reject_generics(input: &DeriveInput, derive: &str) -> SynResult<()> {
    if input.generics.params.is_empty() {
        Ok(())
    } else {
        Err(syn::Error::new_spanned(
            &input.generics,
            format!("#[derive({derive})] does not support generic types"),
        ))
    }
}

#[proc_macro_derive(Dto, attributes(dto))]
pub fn derive_dto(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_dto(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn param_spec(ty: &Type, wire: &str, attrs: &FieldAttrs) -> TokenStream2 {
    let mut spec = quote! { ::brrtdto::ParamSpec::of::<#ty>(#wire) };
    match &attrs.default {
        Some(FieldDefault::Trait) => {
            spec = quote! { #spec.with_default::<#ty>(::core::default::Default::default()) };
        }
        Some(FieldDefault::Expr(expr)) => {
            spec = quote! { #spec.with_default::<#ty>(#expr) };
        }
        None => {}
    }
    if let Some(caster) = &attrs.caster {
        spec = quote! { #spec.with_caster(#caster) };
    }
    if let Some(doc) = &attrs.doc {
        spec = quote! { #spec.with_doc(#doc) };
    }
    spec
}

fn expand_dto(input: &DeriveInput) -> SynResult<TokenStream2> {
    reject_generics(input, "Dto")?;
    let ident = &input.ident;
    let type_attrs = parse_type_attrs(&input.attrs)?;
    let name = type_name(ident, &type_attrs);
    let doc = type_attrs
        .doc
        .as_ref()
        .map(LitStr::value)
        .or_else(|| doc_comments(&input.attrs));
    let doc = match doc {
        Some(doc) => quote! { ::core::option::Option::Some(#doc) },
        None => quote! { ::core::option::Option::None },
    };

    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            ident,
            "#[derive(Dto)] only supports structs",
        ));
    };

    let (specs, construct) = match &data.fields {
        Fields::Named(named) => {
            let mut specs = Vec::new();
            let mut inits = Vec::new();
            for field in &named.named {
                let Some(field_ident) = &field.ident else {
                    continue;
                };
                let ty = &field.ty;
                let attrs = parse_field_attrs(&field.attrs)?;
                let wire = attrs
                    .rename
                    .as_ref()
                    .map_or_else(|| field_ident.to_string(), LitStr::value);
                specs.push(param_spec(ty, &wire, &attrs));
                inits.push(quote! { #field_ident: args.next::<#ty>()? });
            }
            (specs, quote! { Self { #(#inits),* } })
        }
        Fields::Unit => (Vec::new(), quote! { Self }),
        Fields::Unnamed(_) => {
            return Err(syn::Error::new_spanned(
                ident,
                "#[derive(Dto)] needs named fields; parameters are matched by name",
            ))
        }
    };

    let args_ident = if specs.is_empty() {
        quote! { _args }
    } else {
        quote! { args }
    };

    Ok(quote! {
        impl ::brrtdto::Dto for #ident {
            const NAME: &'static str = #name;
            const DOC: ::core::option::Option<&'static str> = #doc;

            fn shape() -> ::brrtdto::Shape {
                ::brrtdto::Shape::constructor(::std::vec![#(#specs),*])
            }

            fn construct(#args_ident: &mut ::brrtdto::Args) -> ::brrtdto::ConstructResult<Self> {
                ::core::result::Result::Ok(#construct)
            }
        }

        impl ::brrtdto::FieldType for #ident {
            fn type_tag() -> ::brrtdto::TypeTag {
                ::brrtdto::dto::object_tag::<Self>()
            }

            fn from_value(value: ::brrtdto::Value) -> ::core::result::Result<Self, ::brrtdto::Value> {
                ::brrtdto::dto::object_from_value::<Self>(value)
            }

            fn into_value(self) -> ::brrtdto::Value {
                ::brrtdto::dto::object_into_value(self)
            }
        }
    })
}

#[derive(Clone, Copy, PartialEq)]
enum BackingKind {
    Str,
    Int,
}

fn parse_backing(attrs: &[Attribute]) -> SynResult<Option<(BackingKind, TokenStream2)>> {
    let mut out = None;
    for attr in attrs.iter().filter(|a| is_dto(a)) {
        attr.parse_nested_meta(|meta| {
            if !meta.path.is_ident("value") {
                return Err(meta.error("expected `value`"));
            }
            let expr: Expr = meta.value()?.parse()?;
            out = Some(match &expr {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(s), ..
                }) => (BackingKind::Str, quote! { ::brrtdto::Backing::Str(#s) }),
                Expr::Lit(ExprLit {
                    lit: Lit::Int(i), ..
                }) => {
                    let v: i64 = i.base10_parse()?;
                    (BackingKind::Int, quote! { ::brrtdto::Backing::Int(#v) })
                }
                Expr::Unary(ExprUnary {
                    op: UnOp::Neg(_),
                    expr: inner,
                    ..
                }) => match inner.as_ref() {
                    Expr::Lit(ExprLit {
                        lit: Lit::Int(i), ..
                    }) => {
                        let v: i64 = -i.base10_parse::<i64>()?;
                        (BackingKind::Int, quote! { ::brrtdto::Backing::Int(#v) })
                    }
                    _ => return Err(syn::Error::new_spanned(&expr, "expected a string or integer literal")),
                },
                _ => return Err(syn::Error::new_spanned(&expr, "expected a string or integer literal")),
            });
            Ok(())
        })?;
    }
    Ok(out)
}

#[proc_macro_derive(BackedEnum, attributes(dto))]
pub fn derive_backed_enum(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_backed_enum(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_backed_enum(input: &DeriveInput) -> SynResult<TokenStream2> {
    reject_generics(input, "BackedEnum")?;
    let ident = &input.ident;
    let name = type_name(ident, &parse_type_attrs(&input.attrs)?);

    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            ident,
            "#[derive(BackedEnum)] only supports enums",
        ));
    };

    let mut kind = None;
    let mut cases = Vec::new();
    let mut from_index = Vec::new();
    let mut index = Vec::new();
    for (i, variant) in data.variants.iter().enumerate() {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "#[derive(BackedEnum)] variants cannot carry fields",
            ));
        }
        let variant_ident = &variant.ident;
        let member = variant_ident.to_string();
        let backing = match parse_backing(&variant.attrs)? {
            Some((this, tokens)) => {
                if kind.is_some_and(|k| k != this) {
                    return Err(syn::Error::new_spanned(
                        variant,
                        "all backing values must be strings or all integers",
                    ));
                }
                kind = Some(this);
                quote! { ::core::option::Option::Some(#tokens) }
            }
            None => quote! { ::core::option::Option::None },
        };
        cases.push(quote! { ::brrtdto::EnumCase::new(#member, #backing) });
        from_index.push(quote! { #i => ::core::option::Option::Some(Self::#variant_ident) });
        index.push(quote! { Self::#variant_ident => #i });
    }

    Ok(quote! {
        impl ::brrtdto::BackedEnum for #ident {
            const NAME: &'static str = #name;

            fn cases() -> &'static [::brrtdto::EnumCase] {
                const CASES: &[::brrtdto::EnumCase] = &[#(#cases),*];
                CASES
            }

            fn from_index(index: usize) -> ::core::option::Option<Self> {
                match index {
                    #(#from_index,)*
                    _ => ::core::option::Option::None,
                }
            }

            fn index(&self) -> usize {
                match *self {
                    #(#index,)*
                }
            }
        }

        impl ::brrtdto::FieldType for #ident {
            fn type_tag() -> ::brrtdto::TypeTag {
                ::brrtdto::dto::enum_tag::<Self>()
            }

            fn from_value(value: ::brrtdto::Value) -> ::core::result::Result<Self, ::brrtdto::Value> {
                ::brrtdto::dto::enum_from_value::<Self>(value)
            }

            fn into_value(self) -> ::brrtdto::Value {
                ::brrtdto::dto::enum_into_value(self)
            }
        }
    })
}
