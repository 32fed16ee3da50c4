//! The parsed form of a `capability!{..}` declaration.

use std::collections::HashSet;

use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    Attribute, Expr, GenericArgument, GenericParam, Generics, Ident, PathArguments, Token, Type,
    TypeParamBound, Visibility, WhereClause,
};

use crate::parse_utils::spanned_err;

/// A whole declaration: wrapper name, type parameters, the subject binding
/// and its capability bounds, and the ordered operation list.
#[derive(Debug)]
pub(crate) struct CapabilityDecl {
    pub(crate) attrs: Vec<Attribute>,
    pub(crate) vis: Visibility,
    pub(crate) name: Ident,
    /// Only type parameters are accepted, lifetimes and const parameters
    /// are rejected in `check_declaration`.
    pub(crate) generics: Generics,
    /// The name the operation bodies use to refer to the wrapped value.
    pub(crate) subject_binding: Ident,
    pub(crate) subject_bounds: Punctuated<TypeParamBound, Token![+]>,
    /// Which marker-like capabilities appear in `subject_bounds` by plain
    /// identifier, gating the generated impls.
    pub(crate) flags: BoundFlags,
    pub(crate) operations: Vec<OperationDecl>,
}

/// One `fn name(&self, ..) -> Ret = body;` entry.
#[derive(Debug)]
pub(crate) struct OperationDecl {
    pub(crate) attrs: Vec<Attribute>,
    pub(crate) name: Ident,
    pub(crate) params: Vec<OperationParam>,
    /// `None` stands for the unit return type.
    pub(crate) ret: Option<Type>,
    pub(crate) body: Expr,
}

#[derive(Debug)]
pub(crate) struct OperationParam {
    pub(crate) name: Ident,
    pub(crate) ty: Type,
}

#[derive(Debug, Default, Copy, Clone)]
pub(crate) struct BoundFlags {
    pub(crate) send: bool,
    pub(crate) sync: bool,
    pub(crate) clone: bool,
    pub(crate) debug: bool,
    pub(crate) display: bool,
}

impl BoundFlags {
    fn scan(bounds: &Punctuated<TypeParamBound, Token![+]>) -> Self {
        let mut this = BoundFlags::default();
        for bound in bounds {
            let trait_bound = match bound {
                TypeParamBound::Trait(x) => x,
                TypeParamBound::Lifetime(_) => continue,
            };
            let ident = match trait_bound.path.get_ident() {
                Some(x) => x.to_string(),
                None => continue,
            };
            match ident.as_str() {
                "Send" => this.send = true,
                "Sync" => this.sync = true,
                "Clone" => this.clone = true,
                "Debug" => this.debug = true,
                "Display" => this.display = true,
                _ => {}
            }
        }
        this
    }
}

impl Parse for CapabilityDecl {
    fn parse(input: ParseStream<'_>) -> syn::Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let vis: Visibility = input.parse()?;
        input.parse::<Token![struct]>()?;
        let name: Ident = input.parse()?;
        let mut generics: Generics = input.parse()?;

        input.parse::<Token![for]>()?;
        let subject_binding: Ident = input.parse()?;
        input.parse::<Token![:]>()?;
        let subject_bounds =
            Punctuated::<TypeParamBound, Token![+]>::parse_separated_nonempty(input)?;

        if input.peek(Token![where]) {
            generics.where_clause = Some(input.parse::<WhereClause>()?);
        }

        let content;
        syn::braced!(content in input);
        let mut operations = Vec::<OperationDecl>::new();
        while !content.is_empty() {
            operations.push(content.parse()?);
        }

        let this = CapabilityDecl {
            attrs,
            vis,
            name,
            generics,
            subject_binding,
            flags: BoundFlags::scan(&subject_bounds),
            subject_bounds,
            operations,
        };
        check_declaration(&this)?;
        Ok(this)
    }
}

impl Parse for OperationDecl {
    fn parse(input: ParseStream<'_>) -> syn::Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        input.parse::<Token![fn]>()?;
        let name: Ident = input.parse()?;

        let args;
        syn::parenthesized!(args in input);
        args.parse::<Token![&]>()?;
        if args.peek(Token![mut]) {
            return Err(args.error("operations take `&self`, the wrapper is immutable"));
        }
        args.parse::<Token![self]>()?;

        let mut params = Vec::<OperationParam>::new();
        while !args.is_empty() {
            args.parse::<Token![,]>()?;
            if args.is_empty() {
                break;
            }
            let name: Ident = args.parse()?;
            args.parse::<Token![:]>()?;
            let ty: Type = args.parse()?;
            params.push(OperationParam { name, ty });
        }

        let ret = if input.peek(Token![->]) {
            input.parse::<Token![->]>()?;
            Some(input.parse::<Type>()?)
        } else {
            None
        };

        input.parse::<Token![=]>()?;
        let body: Expr = input.parse()?;
        input.parse::<Token![;]>()?;

        Ok(OperationDecl {
            attrs,
            name,
            params,
            ret,
            body,
        })
    }
}

/// Lifetime positions found in a parameter or return type.
#[derive(Debug, Default, Copy, Clone)]
struct LifetimeUses {
    /// A `&T` or `'_` left for elision to resolve.
    elided: bool,
    /// Any reference or lifetime argument, named ones included.
    any: bool,
}

impl LifetimeUses {
    fn scan(ty: &Type) -> Self {
        let mut this = LifetimeUses::default();
        this.walk(ty);
        this
    }

    fn walk(&mut self, ty: &Type) {
        match ty {
            Type::Reference(reference) => {
                self.any = true;
                if reference.lifetime.as_ref().map_or(true, |lt| lt.ident == "_") {
                    self.elided = true;
                }
                self.walk(&reference.elem);
            }
            Type::Paren(x) => self.walk(&x.elem),
            Type::Group(x) => self.walk(&x.elem),
            Type::Ptr(x) => self.walk(&x.elem),
            Type::Slice(x) => self.walk(&x.elem),
            Type::Array(x) => self.walk(&x.elem),
            Type::Tuple(x) => {
                for elem in &x.elems {
                    self.walk(elem);
                }
            }
            Type::Path(x) => {
                if let Some(qself) = &x.qself {
                    self.walk(&qself.ty);
                }
                for segment in &x.path.segments {
                    let args = match &segment.arguments {
                        PathArguments::AngleBracketed(x) => &x.args,
                        _ => continue,
                    };
                    for arg in args {
                        match arg {
                            GenericArgument::Lifetime(lt) => {
                                self.any = true;
                                if lt.ident == "_" {
                                    self.elided = true;
                                }
                            }
                            GenericArgument::Type(ty) => self.walk(ty),
                            GenericArgument::Binding(binding) => self.walk(&binding.ty),
                            _ => {}
                        }
                    }
                }
            }
            // `fn(..)` pointers bind their own lifetimes, nothing in them
            // is resolved against this signature.
            _ => {}
        }
    }
}

/// Everything rejected after parsing: non-type generics, reserved names,
/// and operation lists that could not expand to a well-formed module.
fn check_declaration(decl: &CapabilityDecl) -> syn::Result<()> {
    for param in &decl.generics.params {
        match param {
            GenericParam::Type(type_param) => {
                if type_param.ident == "_Subject" || type_param.ident == "_Unseal" {
                    return Err(spanned_err(
                        &type_param.ident,
                        &"`_Subject` and `_Unseal` are reserved for generated code",
                    ));
                }
            }
            GenericParam::Lifetime(_) | GenericParam::Const(_) => {
                return Err(spanned_err(
                    param,
                    &"capability declarations only take type parameters",
                ));
            }
        }
    }

    if decl.subject_binding.to_string().starts_with("__cap") {
        return Err(spanned_err(
            &decl.subject_binding,
            &"names starting with `__cap` are reserved",
        ));
    }

    let mut seen = HashSet::<String>::new();
    for op in &decl.operations {
        let op_name = op.name.to_string();
        if op_name.starts_with("cap_") || op_name.starts_with("__cap") {
            return Err(spanned_err(
                &op.name,
                &"operation names starting with `cap_` are reserved for wrapper methods",
            ));
        }
        if op_name == "bind" {
            return Err(spanned_err(
                &op.name,
                &"`bind` is reserved for the constructor",
            ));
        }
        if op_name == "_cap_tys" {
            return Err(spanned_err(
                &op.name,
                &"`_cap_tys` is reserved for the dispatch table",
            ));
        }
        if !seen.insert(op_name) {
            return Err(spanned_err(&op.name, &"duplicate operation name"));
        }
        for param in &op.params {
            if param.name == decl.subject_binding {
                return Err(spanned_err(
                    &param.name,
                    &"parameter shadows the subject binding",
                ));
            }
            if param.name.to_string().starts_with("__cap") {
                return Err(spanned_err(
                    &param.name,
                    &"names starting with `__cap` are reserved",
                ));
            }
        }
        // A return borrow elides to the subject reference's lifetime, which
        // only works while that is the one lifetime in the inputs.
        if let Some(ret) = &op.ret {
            if LifetimeUses::scan(ret).elided
                && op
                    .params
                    .iter()
                    .any(|param| LifetimeUses::scan(&param.ty).any)
            {
                return Err(spanned_err(
                    ret,
                    &"operations that return a borrow cannot also take reference parameters",
                ));
            }
        }
    }
    Ok(())
}
